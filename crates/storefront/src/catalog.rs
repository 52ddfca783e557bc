//! Catalog loading.
//!
//! The catalog is read once at startup, either from the JSON file named by
//! `STOREFRONT_CATALOG_PATH` or from the catalog embedded in the binary
//! (`content/catalog.json`). It is immutable for the life of the process.

use std::path::{Path, PathBuf};

use static_shop_core::{Catalog, CatalogError};
use thiserror::Error;

/// The catalog compiled into the binary.
const EMBEDDED_CATALOG: &str = include_str!("../content/catalog.json");

/// Errors loading the catalog at startup.
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid catalog {origin}: {source}")]
    Invalid {
        origin: String,
        source: CatalogError,
    },
}

/// Load the catalog from `path`, or the embedded catalog when `None`.
///
/// # Errors
///
/// Returns `CatalogLoadError` if the file cannot be read or fails validation.
pub fn load_catalog(path: Option<&Path>) -> Result<Catalog, CatalogLoadError> {
    let Some(path) = path else {
        let catalog = embedded_catalog()?;
        tracing::info!(products = catalog.len(), "Using embedded catalog");
        return Ok(catalog);
    };

    let json = std::fs::read_to_string(path).map_err(|source| CatalogLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let catalog = Catalog::from_json(&json).map_err(|source| CatalogLoadError::Invalid {
        origin: path.display().to_string(),
        source,
    })?;

    tracing::info!(path = %path.display(), products = catalog.len(), "Catalog loaded");
    Ok(catalog)
}

/// The catalog shipped with the binary.
///
/// # Errors
///
/// Returns `CatalogLoadError::Invalid` if the embedded JSON is invalid.
pub fn embedded_catalog() -> Result<Catalog, CatalogLoadError> {
    Catalog::from_json(EMBEDDED_CATALOG).map_err(|source| CatalogLoadError::Invalid {
        origin: "(embedded)".to_string(),
        source,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use static_shop_core::ProductId;

    use super::*;

    #[test]
    fn test_embedded_catalog_is_valid() {
        let catalog = embedded_catalog().unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.categories(), vec!["electronics", "clothing"]);

        let headphones = catalog.get(ProductId::new(1)).unwrap();
        assert_eq!(headphones.price.to_fixed(), "99.99");
        assert!(headphones.has_gallery());
    }

    #[test]
    fn test_load_catalog_without_path_uses_embedded() {
        assert_eq!(load_catalog(None).unwrap(), embedded_catalog().unwrap());
    }

    #[test]
    fn test_load_catalog_missing_file() {
        let err = load_catalog(Some(Path::new("/nonexistent/catalog.json"))).unwrap_err();
        assert!(matches!(err, CatalogLoadError::Io { .. }));
    }

    #[test]
    fn test_load_catalog_from_file() {
        let path = std::env::temp_dir().join(format!("catalog-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            r#"[{"id": 9, "name": "Lamp", "description": "Desk lamp", "price": "35.00",
                 "category": "home", "images": ["https://img.example/lamp.jpg"]}]"#,
        )
        .unwrap();

        let catalog = load_catalog(Some(&path)).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(ProductId::new(9)).unwrap().name, "Lamp");
    }

    #[test]
    fn test_load_catalog_rejects_invalid_file() {
        let path = std::env::temp_dir().join(format!("catalog-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, r#"[{"id": 1}]"#).unwrap();

        let err = load_catalog(Some(&path)).unwrap_err();
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(err, CatalogLoadError::Invalid { .. }));
    }
}
