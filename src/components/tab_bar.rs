use iocraft::prelude::*;

use crate::dashboard::Dashboard;
use crate::panel::LoadState;
use crate::types::PanelKind;

// ---------------------------------------------------------------------------
// TabBar component
// ---------------------------------------------------------------------------

/// Pre-rendered tab data (all owned, no lifetime issues).
pub struct RenderedTabBar {
    pub tabs: Vec<RenderedTab>,
    pub active_fg: Color,
    pub inactive_fg: Color,
    pub border_fg: Color,
}

pub struct RenderedTab {
    pub label: String,
    pub is_active: bool,
}

impl RenderedTabBar {
    /// One tab per panel; loaded panels show their row count.
    pub fn build(dashboard: &Dashboard) -> Self {
        let tabs = PanelKind::ALL
            .iter()
            .map(|&kind| {
                let panel = dashboard.panel(kind);
                let label = if *panel.state() == LoadState::Ready {
                    format!(" {} {} ({}) ", kind.index() + 1, kind.title(), panel.layout().row_count())
                } else {
                    format!(" {} {} ", kind.index() + 1, kind.title())
                };
                RenderedTab {
                    label,
                    is_active: kind == dashboard.active(),
                }
            })
            .collect();

        Self {
            tabs,
            active_fg: Color::Cyan,
            inactive_fg: Color::DarkGrey,
            border_fg: Color::DarkGrey,
        }
    }
}

#[derive(Default, Props)]
pub struct TabBarProps {
    pub tab_bar: Option<RenderedTabBar>,
}

#[component]
pub fn TabBar(props: &mut TabBarProps) -> impl Into<AnyElement<'static>> {
    let Some(tb) = props.tab_bar.take() else {
        return element! { View }.into_any();
    };

    let active_fg = tb.active_fg;
    let inactive_fg = tb.inactive_fg;

    element! {
        View(
            border_style: BorderStyle::Single,
            border_edges: Edges::Bottom,
            border_color: tb.border_fg,
            padding_left: 1,
        ) {
            #(tb.tabs.into_iter().enumerate().map(|(i, tab)| {
                let (fg, bg, weight) = if tab.is_active {
                    (Color::White, Some(active_fg), Weight::Bold)
                } else {
                    (inactive_fg, None, Weight::Normal)
                };

                element! {
                    View(key: i, padding_right: 1, background_color: bg.unwrap_or(Color::Reset)) {
                        Text(content: tab.label, color: fg, weight, wrap: TextWrap::NoWrap)
                    }
                }
            }))
        }
    }
    .into_any()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::{DashboardOptions, Message};

    #[test]
    fn active_tab_follows_dashboard() {
        let mut dashboard = Dashboard::new(DashboardOptions::default());
        dashboard.start();
        dashboard.handle(Message::ActivateTab(PanelKind::All));
        let bar = RenderedTabBar::build(&dashboard);
        let labels: Vec<&str> = bar.tabs.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec![" 1 My PRs ", " 2 My Requests ", " 3 All PRs "]);
        assert!(bar.tabs[2].is_active);
        assert!(!bar.tabs[0].is_active);
    }
}
