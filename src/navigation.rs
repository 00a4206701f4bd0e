//! Bottom tab bar shared by every signed-in screen.

use axum::{extract::Query, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    Home,
    Dashboard,
    Compare,
    History,
    Profile,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[Tab::Home, Tab::Dashboard, Tab::Compare, Tab::History, Tab::Profile]
    }

    pub fn route(&self) -> &'static str {
        match self {
            Tab::Home => "/",
            Tab::Dashboard => "/dashboard",
            Tab::Compare => "/compare",
            Tab::History => "/history",
            Tab::Profile => "/profile",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Home => "Home",
            Tab::Dashboard => "Dashboard",
            Tab::Compare => "Compare",
            Tab::History => "History",
            Tab::Profile => "Profile",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Tab::Home => "home",
            Tab::Dashboard => "bar-chart",
            Tab::Compare => "arrow-right-left",
            Tab::History => "history",
            Tab::Profile => "user",
        }
    }
}

/// Exact path match only; `/history/123` highlights nothing.
pub fn active_tab(path: &str) -> Option<Tab> {
    Tab::all().iter().copied().find(|t| t.route() == path)
}

#[derive(Debug, Serialize)]
pub struct TabView {
    pub tab: Tab,
    pub label: &'static str,
    pub route: &'static str,
    pub icon: &'static str,
    pub active: bool,
}

#[derive(Debug, Deserialize)]
pub struct NavigationQuery {
    pub path: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/navigation", get(get_navigation))
}

pub async fn get_navigation(Query(q): Query<NavigationQuery>) -> Json<Vec<TabView>> {
    let active = q.path.as_deref().and_then(active_tab);
    Json(
        Tab::all()
            .iter()
            .map(|&tab| TabView {
                tab,
                label: tab.label(),
                route: tab.route(),
                icon: tab.icon(),
                active: Some(tab) == active,
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_tabs_in_bar_order() {
        let labels: Vec<_> = Tab::all().iter().map(Tab::label).collect();
        assert_eq!(labels, ["Home", "Dashboard", "Compare", "History", "Profile"]);
    }

    #[test]
    fn active_tab_requires_exact_match() {
        assert_eq!(active_tab("/"), Some(Tab::Home));
        assert_eq!(active_tab("/history"), Some(Tab::History));
        assert_eq!(active_tab("/history/"), None);
        assert_eq!(active_tab("/auth"), None);
    }

    #[tokio::test]
    async fn marks_only_the_current_tab() {
        let Json(tabs) = get_navigation(Query(NavigationQuery {
            path: Some("/compare".into()),
        }))
        .await;
        let active: Vec<_> = tabs.iter().filter(|t| t.active).map(|t| t.tab).collect();
        assert_eq!(active, [Tab::Compare]);

        let Json(tabs) = get_navigation(Query(NavigationQuery { path: None })).await;
        assert!(tabs.iter().all(|t| !t.active));
    }
}
