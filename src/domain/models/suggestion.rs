use serde_derive::Serialize;

/// A pre-written prompt offered as a one-tap alternative to typing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickSuggestion {
    pub display_text: &'static str,
    /// Empty means "let the user type freely".
    pub query: &'static str,
}

impl QuickSuggestion {
    pub const fn new(display_text: &'static str, query: &'static str) -> QuickSuggestion {
        return QuickSuggestion {
            display_text,
            query,
        };
    }

    pub fn is_free_form(&self) -> bool {
        return self.query.is_empty();
    }
}
