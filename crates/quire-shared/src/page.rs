//! Page objects: the server answers every navigation with the name of the
//! page component to render and its props.

use serde::{Deserialize, Serialize};

/// One-shot message shown by the page that receives it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageView<P> {
    pub component: String,
    pub props: P,
    /// URL of the request that produced this page.
    pub url: String,
    #[serde(default)]
    pub flash: Flash,
}

impl<P> PageView<P> {
    pub fn new(component: impl Into<String>, props: P, url: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            props,
            url: url.into(),
            flash: Flash::default(),
        }
    }

    pub fn with_flash(mut self, message: Option<String>) -> Self {
        self.flash = Flash { message };
        self
    }
}
