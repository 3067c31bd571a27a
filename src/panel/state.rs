use crate::content::ExtractionResult;
use std::sync::Arc;

/// Everything the presentation layer needs to draw the panel
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelState {
    /// URL of the tracked tab; `None` until an active-tab query succeeds
    pub url: Option<String>,

    /// Latest extraction; `None` right after a navigation until the next one lands
    pub result: Option<Arc<ExtractionResult>>,

    pub loading: bool,

    /// Id of the element most recently navigated to
    pub selected: Option<String>,
}

impl PanelState {
    pub fn has_content(&self) -> bool {
        self.result.as_ref().is_some_and(|result| !result.is_empty())
    }
}
