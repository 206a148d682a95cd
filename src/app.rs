use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use iocraft::prelude::*;

use crate::actions::open_in_browser;
use crate::components::footer::{Footer, RenderedFooter};
use crate::components::tab_bar::{RenderedTabBar, TabBar};
use crate::components::table::{RenderedTable, ScrollableTable, TableBuildConfig};
use crate::dashboard::{Dashboard, DashboardOptions, Effect, Message};
use crate::engine::{EngineHandle, Event, Request};
use crate::keys::key_event_to_string;
use crate::panel::{LoadState, Panel};

/// How often engine replies and the refresh deadline are checked.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

impl From<Event> for Message {
    fn from(event: Event) -> Self {
        match event {
            Event::PrsFetched { ticket, result } => Message::Fetched { ticket, result },
        }
    }
}

// ---------------------------------------------------------------------------
// Effect execution
// ---------------------------------------------------------------------------

/// Everything needed to carry out the dashboard's effects.
#[derive(Clone)]
struct Host {
    engine: Option<EngineHandle>,
    reply_tx: Sender<Event>,
    tick_deadline: State<Option<Instant>>,
    should_exit: State<bool>,
}

impl Host {
    /// Apply one step to the dashboard state and run the effects it returns.
    fn run(
        &mut self,
        dashboard: &mut State<Dashboard>,
        step: impl FnOnce(&mut Dashboard) -> Vec<Effect>,
    ) {
        let mut next = dashboard.read().clone();
        for effect in step(&mut next) {
            match effect {
                Effect::Fetch(query) => {
                    if let Some(ref engine) = self.engine {
                        engine.send(Request::FetchPrs {
                            query,
                            reply_tx: self.reply_tx.clone(),
                        });
                    }
                }
                Effect::OpenUrl(url) => {
                    if let Err(e) = open_in_browser(&url) {
                        next.record_open_failure(e);
                    }
                }
                Effect::Quit => {
                    if let Some(ref engine) = self.engine {
                        engine.send(Request::Shutdown);
                    }
                    self.should_exit.set(true);
                }
                Effect::ScheduleTick(interval) => {
                    self.tick_deadline.set(Some(Instant::now() + interval));
                }
            }
        }
        dashboard.set(next);
    }

    fn dispatch(&mut self, dashboard: &mut State<Dashboard>, message: Message) {
        self.run(dashboard, |d| d.handle(message));
    }
}

fn empty_message(panel: &Panel) -> Option<&'static str> {
    (*panel.state() == LoadState::Ready).then_some("No pull requests")
}

// ---------------------------------------------------------------------------
// Root App component
// ---------------------------------------------------------------------------

#[derive(Default, Props)]
pub struct AppProps<'a> {
    pub options: Option<&'a DashboardOptions>,
    pub engine: Option<&'a EngineHandle>,
}

#[component]
pub fn App<'a>(props: &AppProps<'a>, mut hooks: Hooks) -> impl Into<AnyElement<'a>> {
    let (width, height) = hooks.use_terminal_size();
    let mut system = hooks.use_context_mut::<SystemContext>();
    let should_exit = hooks.use_state(|| false);

    let options = props.options.cloned().unwrap_or_default();
    let mut dashboard = hooks.use_state(move || Dashboard::new(options));
    let tick_deadline = hooks.use_state(|| Option::<Instant>::None);
    let mut started = hooks.use_state(|| false);
    let mut last_size = hooks.use_state(|| (0u16, 0u16));

    // Event channel: engine pushes replies back to the UI.
    let event_channel = hooks.use_state(|| {
        let (tx, rx) = std::sync::mpsc::channel::<Event>();
        (tx, Arc::new(Mutex::new(rx)))
    });
    let (reply_tx, event_rx) = event_channel.read().clone();

    let host = Host {
        engine: props.engine.cloned(),
        reply_tx,
        tick_deadline,
        should_exit,
    };

    // First render: focus the start tab.
    if !started.get() {
        started.set(true);
        host.clone().run(&mut dashboard, Dashboard::start);
    }

    // Terminal size changes reach every panel.
    if last_size.get() != (width, height) {
        last_size.set((width, height));
        host.clone().dispatch(&mut dashboard, Message::Resize { width, height });
    }

    // Event polling: drain engine replies, then fire the refresh timer when due.
    {
        let mut host = host.clone();
        hooks.use_future(async move {
            loop {
                smol::Timer::after(POLL_INTERVAL).await;
                let events: Vec<Event> = {
                    let Ok(rx) = event_rx.lock() else {
                        tracing::warn!("app: event channel poisoned");
                        break;
                    };
                    let mut evts = Vec::new();
                    while let Ok(evt) = rx.try_recv() {
                        evts.push(evt);
                    }
                    evts
                };
                for evt in events {
                    host.dispatch(&mut dashboard, evt.into());
                }

                let due = host
                    .tick_deadline
                    .get()
                    .is_some_and(|deadline| Instant::now() >= deadline);
                if due {
                    host.tick_deadline.set(None);
                    host.dispatch(&mut dashboard, Message::Tick);
                }
            }
        });
    }

    // Keyboard handling.
    {
        let mut host = host.clone();
        hooks.use_terminal_events(move |event| {
            if let TerminalEvent::Key(KeyEvent {
                code,
                modifiers,
                kind,
                ..
            }) = event
                && let Some(key) = key_event_to_string(code, modifiers, kind)
            {
                host.dispatch(&mut dashboard, Message::Key(key));
            }
        });
    }

    // Exit handling.
    if should_exit.get() {
        system.exit();
    }

    let (tab_bar, table, footer) = {
        let dash = dashboard.read();
        let panel = dash.active_panel();
        let table = RenderedTable::build(&TableBuildConfig {
            layout: panel.layout(),
            cursor: panel.cursor(),
            scroll_offset: panel.scroll_offset(),
            visible_rows: panel.viewport_height(),
            empty_message: empty_message(panel),
        });
        (
            RenderedTabBar::build(&dash),
            table,
            RenderedFooter::build(&dash),
        )
    };

    element! {
        View(width: u32::from(width), height: u32::from(height), flex_direction: FlexDirection::Column) {
            TabBar(tab_bar: Some(tab_bar))
            ScrollableTable(table: Some(table))
            Footer(footer: Some(footer))
        }
    }
}
