use iocraft::prelude::*;

use crate::dashboard::Dashboard;

// ---------------------------------------------------------------------------
// Footer component: status line
// ---------------------------------------------------------------------------

pub struct RenderedFooter {
    /// Panel status, active filters and the last error.
    pub status_text: String,
    /// Last refresh time and auto-refresh interval.
    pub refresh_text: String,
    pub help_hint: String,
    pub text_fg: Color,
    pub error_fg: Color,
    pub has_error: bool,
    pub border_fg: Color,
}

impl RenderedFooter {
    pub fn build(dashboard: &Dashboard) -> Self {
        Self {
            status_text: dashboard.footer_status(),
            refresh_text: dashboard.footer_refresh(),
            help_hint: "q quit  r reload  d drafts  c closed  w wide".to_owned(),
            text_fg: Color::Grey,
            error_fg: Color::Red,
            has_error: dashboard.error().is_some(),
            border_fg: Color::DarkGrey,
        }
    }
}

#[derive(Default, Props)]
pub struct FooterProps {
    pub footer: Option<RenderedFooter>,
}

#[component]
pub fn Footer(props: &mut FooterProps) -> impl Into<AnyElement<'static>> {
    let Some(f) = props.footer.take() else {
        return element! { View }.into_any();
    };

    let status_fg = if f.has_error { f.error_fg } else { f.text_fg };
    let text_fg = f.text_fg;
    let refresh_text = (!f.refresh_text.is_empty()).then_some(f.refresh_text);

    element! {
        View(
            border_style: BorderStyle::Single,
            border_edges: Edges::Top,
            border_color: f.border_fg,
            padding_left: 1,
            padding_right: 1,
        ) {
            // Left: status (flex_grow to fill space)
            View(flex_grow: 1.0) {
                Text(content: f.status_text, color: status_fg, wrap: TextWrap::NoWrap)
            }
            // Right: last refresh, then help hint
            #(refresh_text.into_iter().map(|text| {
                element! {
                    View(padding_right: 2) {
                        Text(content: text, color: text_fg, wrap: TextWrap::NoWrap)
                    }
                }
            }))
            Text(content: f.help_hint, color: f.border_fg, wrap: TextWrap::NoWrap)
        }
    }
    .into_any()
}
