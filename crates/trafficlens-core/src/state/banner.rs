/// Alert banner visibility.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AlertBanner {
    #[default]
    Hidden,
    Visible { message: String, generation: u64 },
}

impl AlertBanner {
    pub fn is_visible(&self) -> bool {
        matches!(self, Self::Visible { .. })
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Visible { message, .. } => Some(message),
            Self::Hidden => None,
        }
    }
}

/// Banner plus the generation counter that owns it.
///
/// Every `show` bumps the generation; `expire` only hides the banner when
/// called with the generation that is currently displayed.
#[derive(Debug, Clone, Default)]
pub struct BannerSlot {
    banner: AlertBanner,
    generation: u64,
}

impl BannerSlot {
    pub fn show(&mut self, message: impl Into<String>) -> u64 {
        self.generation += 1;
        self.banner = AlertBanner::Visible {
            message: message.into(),
            generation: self.generation,
        };
        self.generation
    }

    /// Returns `true` if the banner was hidden by this call.
    pub fn expire(&mut self, generation: u64) -> bool {
        match &self.banner {
            AlertBanner::Visible { generation: shown, .. } if *shown == generation => {
                self.banner = AlertBanner::Hidden;
                true
            }
            _ => false,
        }
    }

    pub fn banner(&self) -> &AlertBanner {
        &self.banner
    }
}
