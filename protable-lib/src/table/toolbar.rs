//! Toolbar state: density and the option buttons.

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

use super::config::Toggle;
use crate::intl::Intl;

/// Row density of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Density {
    Large,
    #[default]
    Middle,
    Small,
}

impl Density {
    pub const ALL: [Density; 3] = [Density::Large, Density::Middle, Density::Small];

    pub fn as_str(&self) -> &'static str {
        match self {
            Density::Large => "large",
            Density::Middle => "middle",
            Density::Small => "small",
        }
    }

    pub fn label(&self, intl: &dyn Intl) -> String {
        match self {
            Density::Large => intl.get_message("tableToolBar.densityLarger", "Larger"),
            Density::Middle => intl.get_message("tableToolBar.densityMiddle", "Middle"),
            Density::Small => intl.get_message("tableToolBar.densitySmall", "Compact"),
        }
    }
}

/// Callback receiving the new density.
pub type OnSizeChange = Arc<dyn Fn(Density) + Send + Sync>;

/// Which option buttons the toolbar shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolbarOptions {
    pub reload: bool,
    pub density: bool,
    pub setting: bool,
    pub full_screen: bool,
}

impl Default for ToolbarOptions {
    fn default() -> Self {
        Self {
            reload: true,
            density: true,
            setting: true,
            full_screen: false,
        }
    }
}

impl ToolbarOptions {
    pub fn hidden() -> Self {
        Self {
            reload: false,
            density: false,
            setting: false,
            full_screen: false,
        }
    }
}

impl From<Toggle<ToolbarOptions>> for ToolbarOptions {
    fn from(toggle: Toggle<ToolbarOptions>) -> Self {
        match toggle {
            Toggle::Flag(false) => ToolbarOptions::hidden(),
            Toggle::Flag(true) => ToolbarOptions::default(),
            Toggle::Config(options) => options,
        }
    }
}

/// A toolbar button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ToolbarAction {
    Reload,
    Density,
    Setting,
    FullScreen,
}

/// Density and option buttons of one table.
#[derive(Clone, Default)]
pub struct Toolbar {
    options: ToolbarOptions,
    density: Density,
    full_screen: bool,
    on_size_change: Option<OnSizeChange>,
}

impl Toolbar {
    pub fn new(options: ToolbarOptions, density: Density) -> Self {
        Self {
            options,
            density,
            ..Self::default()
        }
    }

    pub(crate) fn set_on_size_change(&mut self, on_size_change: Option<OnSizeChange>) {
        self.on_size_change = on_size_change;
    }

    pub fn density(&self) -> Density {
        self.density
    }

    /// Changes the density, notifying only on an actual change.
    pub fn set_density(&mut self, density: Density) {
        if density == self.density {
            return;
        }
        self.density = density;
        if let Some(on_size_change) = &self.on_size_change {
            on_size_change(density);
        }
    }

    pub fn is_full_screen(&self) -> bool {
        self.full_screen
    }

    pub fn toggle_full_screen(&mut self) -> bool {
        self.full_screen = !self.full_screen;
        self.full_screen
    }

    /// Enabled buttons with their labels, in display order.
    pub fn actions(&self, intl: &dyn Intl) -> Vec<(ToolbarAction, String)> {
        let mut actions = Vec::new();
        if self.options.reload {
            actions.push((ToolbarAction::Reload, intl.get_message("tableToolBar.reload", "Refresh")));
        }
        if self.options.density {
            actions.push((ToolbarAction::Density, intl.get_message("tableToolBar.density", "Density")));
        }
        if self.options.setting {
            actions.push((
                ToolbarAction::Setting,
                intl.get_message("tableToolBar.columnSetting", "Settings"),
            ));
        }
        if self.options.full_screen {
            let label = if self.full_screen {
                intl.get_message("tableToolBar.exitFullScreen", "Exit Full Screen")
            } else {
                intl.get_message("tableToolBar.fullScreen", "Full Screen")
            };
            actions.push((ToolbarAction::FullScreen, label));
        }
        actions
    }
}

impl fmt::Debug for Toolbar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Toolbar")
            .field("options", &self.options)
            .field("density", &self.density)
            .field("full_screen", &self.full_screen)
            .finish_non_exhaustive()
    }
}
