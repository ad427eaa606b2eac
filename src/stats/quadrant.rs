use crate::model::Task;
use serde::Serialize;

/// Anything scored on importance and urgency
pub trait Prioritized {
    fn importance(&self) -> u8;
    fn urgency(&self) -> u8;
}

impl Prioritized for Task {
    fn importance(&self) -> u8 {
        self.importance
    }

    fn urgency(&self) -> u8 {
        self.urgency
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Quadrant {
    /// Important and urgent
    DoFirst,
    /// Important, not urgent
    Schedule,
    /// Urgent, not important
    Delegate,
    /// Neither
    Eliminate,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::DoFirst,
        Quadrant::Schedule,
        Quadrant::Delegate,
        Quadrant::Eliminate,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Quadrant::DoFirst => "Do First (important, urgent)",
            Quadrant::Schedule => "Schedule (important, not urgent)",
            Quadrant::Delegate => "Delegate (urgent, not important)",
            Quadrant::Eliminate => "Eliminate (neither)",
        }
    }
}

/// Items partitioned around the list's own average importance and urgency
#[derive(Debug)]
pub struct Quadrants<'a, T> {
    pub avg_importance: f64,
    pub avg_urgency: f64,
    pub do_first: Vec<&'a T>,
    pub schedule: Vec<&'a T>,
    pub delegate: Vec<&'a T>,
    pub eliminate: Vec<&'a T>,
}

impl<'a, T> Quadrants<'a, T> {
    pub fn get(&self, quadrant: Quadrant) -> &[&'a T] {
        match quadrant {
            Quadrant::DoFirst => &self.do_first,
            Quadrant::Schedule => &self.schedule,
            Quadrant::Delegate => &self.delegate,
            Quadrant::Eliminate => &self.eliminate,
        }
    }

    pub fn len(&self) -> usize {
        self.do_first.len() + self.schedule.len() + self.delegate.len() + self.eliminate.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Split items into the four importance/urgency quadrants.
///
/// The threshold is the arithmetic mean over `items`, not a fixed midpoint;
/// a score equal to the mean counts as high. An empty slice averages over a
/// divisor of 1 and yields four empty quadrants.
pub fn quadrant_split<T: Prioritized>(items: &[T]) -> Quadrants<'_, T> {
    let divisor = items.len().max(1) as f64;
    let avg_importance = items.iter().map(|t| f64::from(t.importance())).sum::<f64>() / divisor;
    let avg_urgency = items.iter().map(|t| f64::from(t.urgency())).sum::<f64>() / divisor;

    let mut split = Quadrants {
        avg_importance,
        avg_urgency,
        do_first: Vec::new(),
        schedule: Vec::new(),
        delegate: Vec::new(),
        eliminate: Vec::new(),
    };

    for item in items {
        let important = f64::from(item.importance()) >= avg_importance;
        let urgent = f64::from(item.urgency()) >= avg_urgency;
        match (important, urgent) {
            (true, true) => split.do_first.push(item),
            (true, false) => split.schedule.push(item),
            (false, true) => split.delegate.push(item),
            (false, false) => split.eliminate.push(item),
        }
    }

    split
}
