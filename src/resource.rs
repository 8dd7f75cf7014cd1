//! Location of the description framework on the host.

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

use crate::error::EditError;
use crate::settings::FrameworkSettings;

/// Finds host resources the generated project links against.
pub trait ResourceLocating {
    /// Absolute path of the description framework bundle.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::ResourceNotFound`] when no candidate exists.
    fn locate_framework(&self) -> Result<Utf8PathBuf, EditError>;
}

/// Default locator searching next to the running editor.
///
/// An explicit `framework.path` setting wins. Otherwise the framework is
/// looked up beside the editor executable, then in `../lib` and
/// `../Frameworks` relative to it.
#[derive(Debug, Clone)]
pub struct ResourceLocator {
    settings: FrameworkSettings,
    self_path: Utf8PathBuf,
}

impl ResourceLocator {
    /// Create a locator for the editor executable at `self_path`.
    #[must_use]
    pub fn new(settings: FrameworkSettings, self_path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            settings,
            self_path: self_path.into(),
        }
    }

    /// Every location checked, in order.
    #[must_use]
    pub fn candidates(&self) -> Vec<Utf8PathBuf> {
        if let Some(path) = &self.settings.path {
            return vec![path.clone()];
        }
        let name = &self.settings.name;
        let dir = self.self_path.parent().unwrap_or_else(|| Utf8Path::new("."));
        vec![
            dir.join(name),
            dir.join("../lib").join(name),
            dir.join("../Frameworks").join(name),
        ]
    }
}

impl ResourceLocating for ResourceLocator {
    fn locate_framework(&self) -> Result<Utf8PathBuf, EditError> {
        let searched = self.candidates();
        if let Some(found) = searched.iter().find(|candidate| candidate.exists()) {
            debug!(framework = %found, "located description framework");
            return Ok(found.clone());
        }
        Err(EditError::ResourceNotFound {
            name: self.settings.name.clone(),
            searched,
        })
    }
}
