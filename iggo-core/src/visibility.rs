use strum_macros::Display;

/// Whether the user panel is shown. The toggle button is the only way to
/// move between the two states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum PanelVisibility {
    #[strum(serialize = "visible")]
    Visible,
    #[strum(serialize = "hidden")]
    Hidden,
}

impl PanelVisibility {
    pub fn toggle(self) -> Self {
        match self {
            PanelVisibility::Visible => PanelVisibility::Hidden,
            PanelVisibility::Hidden => PanelVisibility::Visible,
        }
    }

    pub fn is_shown(&self) -> bool {
        matches!(self, PanelVisibility::Visible)
    }

    /// Value for the container's CSS `display` property.
    pub fn css_display(&self) -> &'static str {
        match self {
            PanelVisibility::Visible => "block",
            PanelVisibility::Hidden => "none",
        }
    }
}

impl From<bool> for PanelVisibility {
    fn from(display: bool) -> Self {
        if display {
            PanelVisibility::Visible
        } else {
            PanelVisibility::Hidden
        }
    }
}

impl From<PanelVisibility> for bool {
    fn from(visibility: PanelVisibility) -> Self {
        visibility.is_shown()
    }
}
