use crate::environment::types::HomeTab;
use crate::environment::Environment;
use crate::loc;
use crate::store::Effect;

pub const FAB_MESSAGE: &str = "FAB clicked!";

#[derive(Clone, Debug)]
pub enum HomeAction {
    Initial,
    TabSelected(HomeTab),
    FabClicked,
    /// The snackbar was shown and went away
    SnackbarDismissed,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HomeState {
    pub selected_tab: HomeTab,
    pub snackbar_message: Option<String>,
    pub top_bar_title: String,
    pub show_fab: bool,
    pub has_loaded_initial_data: bool,
}

impl Default for HomeState {
    fn default() -> Self {
        Self {
            selected_tab: HomeTab::default(),
            snackbar_message: None,
            top_bar_title: HomeTab::default().to_string(),
            show_fab: true,
            has_loaded_initial_data: false,
        }
    }
}

pub fn reduce(action: HomeAction, state: &mut HomeState, environment: &Environment) -> Effect<HomeAction> {
    log::trace!("{action:?}");
    match action {
        HomeAction::Initial => {
            if !state.has_loaded_initial_data {
                // nothing to load yet, but it only happens once
                state.has_loaded_initial_data = true;
            }
        }
        HomeAction::TabSelected(tab) => {
            environment.navigator.switch_tab(tab);
            state.selected_tab = tab;
            state.top_bar_title = tab.to_string();
        }
        HomeAction::FabClicked => {
            state.snackbar_message = Some(loc!(FAB_MESSAGE).to_string());
        }
        HomeAction::SnackbarDismissed => {
            state.snackbar_message = None;
        }
    }
    Effect::NONE
}
