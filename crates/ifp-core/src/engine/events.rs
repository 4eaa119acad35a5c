#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    PhaseStart { name: &'static str },
    PhaseFinish,

    CompoundPerceived { compound: String, groups: usize },
    CompoundFailed { compound: String, reason: String },
    TemplateSkipped { compound: String, atoms: String, missing: Vec<String> },

    IslandsMerged { islands: usize, interactions: usize },
    ShellsCreated { total: usize, unique: usize },

    Message(String),
}

pub type EventCallback<'a> = Box<dyn Fn(Event) + Send + Sync + 'a>;

#[derive(Default)]
pub struct EventReporter<'a> {
    callback: Option<EventCallback<'a>>,
}

impl<'a> EventReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: EventCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Event) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}
