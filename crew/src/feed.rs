//! Alert and recommendation feeds.
//!
//! Both are newest-first, fixed-size lists refilled at random from fixed
//! catalogs. The randomness is injected so runs can be replayed.

use std::collections::VecDeque;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::roster::CrewMember;

pub const ALERT_CAPACITY: usize = 5;
pub const ALERT_HISTORY_CAPACITY: usize = 50;
pub const RECOMMENDATION_CAPACITY: usize = 3;

/// Newest-first list that drops its oldest entry past `capacity`.
#[derive(Clone, Debug)]
pub struct BoundedFeed<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedFeed<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, item: T) {
        if self.capacity == 0 {
            return;
        }
        self.items.push_front(item);
        self.items.truncate(self.capacity);
    }

    pub fn newest(&self) -> Option<&T> {
        self.items.front()
    }

    /// Removes and returns the first item matching `pred`.
    pub fn take(&mut self, pred: impl FnMut(&T) -> bool) -> Option<T> {
        let idx = self.items.iter().position(pred)?;
        self.items.remove(idx)
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =========================
// Alerts
// =========================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Warning,
    Info,
    Success,
}

/// Cut-offs for picking an alert kind: warning if `u > warning`, else info if
/// a second draw `> info`, else success.
#[derive(Clone, Copy, Debug)]
pub struct AlertOdds {
    pub warning: f64,
    pub info: f64,
}

/// Used when the feed is first populated.
pub const SEED_ODDS: AlertOdds = AlertOdds {
    warning: 0.7,
    info: 0.5,
};

/// Used for alerts raised while running.
pub const LIVE_ODDS: AlertOdds = AlertOdds {
    warning: 0.6,
    info: 0.4,
};

impl AlertKind {
    pub fn pick(rng: &mut impl Rng, odds: AlertOdds) -> Self {
        if rng.gen_range(0.0..1.0) > odds.warning {
            Self::Warning
        } else if rng.gen_range(0.0..1.0) > odds.info {
            Self::Info
        } else {
            Self::Success
        }
    }

    pub fn messages(self) -> &'static [&'static str] {
        match self {
            Self::Warning => &[
                "Elevated stress levels detected",
                "Fatigue indicators rising",
                "Heart rate variability increased",
                "Sleep quality declining",
            ],
            Self::Info => &[
                "Routine biometric scan complete",
                "Mood assessment updated",
                "Quantum analysis in progress",
            ],
            Self::Success => &[
                "Stress levels normalizing",
                "Recovery phase detected",
                "Optimal mood state achieved",
            ],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Alert {
    pub id: u64,
    pub kind: AlertKind,
    pub member: String,
    pub message: &'static str,
    pub ts_ms: u64,
}

impl Alert {
    /// Follow-ups worth checking first for this alert.
    pub fn root_causes(&self) -> &'static [&'static str] {
        if self.member == "Dr. Rodriguez" {
            &["Medics check rest period log", "Review biometric scan"]
        } else if self.kind == AlertKind::Warning {
            &["Schedule group activity", "Assign meditation session"]
        } else {
            &["Monitor status"]
        }
    }

    /// Mission context attached to a few member/kind combinations.
    pub fn context(&self) -> Option<&'static str> {
        match (self.member.as_str(), self.kind) {
            ("Dr. Wilson", AlertKind::Warning) => Some(
                "Dr. Wilson's stress is 12% higher than their personal baseline \
                 during a critical-phase maneuver.",
            ),
            _ => None,
        }
    }
}

/// What an operator did with a live alert.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertAction {
    Acknowledged,
    Assigned,
    Snoozed,
}

/// An alert taken off the live list, with what was done to it and when.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HandledAlert {
    pub alert: Alert,
    pub action: AlertAction,
    pub at_ms: u64,
}

/// Last few crew alerts, newest first, plus the ones already handled.
#[derive(Clone, Debug)]
pub struct AlertFeed {
    feed: BoundedFeed<Alert>,
    handled: BoundedFeed<HandledAlert>,
    next_id: u64,
}

impl Default for AlertFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertFeed {
    pub fn new() -> Self {
        Self {
            feed: BoundedFeed::new(ALERT_CAPACITY),
            handled: BoundedFeed::new(ALERT_HISTORY_CAPACITY),
            next_id: 1,
        }
    }

    /// Fills the feed with three alerts spread over the past hour.
    pub fn seed(&mut self, rng: &mut impl Rng, roster: &[CrewMember], now_ms: u64) {
        for _ in 0..3 {
            let age_ms = rng.gen_range(0..3_600_000u64);
            self.raise_with(rng, roster, now_ms.saturating_sub(age_ms), SEED_ODDS);
        }
    }

    /// Adds one alert stamped `now_ms`. `None` if the roster is empty.
    pub fn raise(&mut self, rng: &mut impl Rng, roster: &[CrewMember], now_ms: u64) -> Option<&Alert> {
        self.raise_with(rng, roster, now_ms, LIVE_ODDS)
    }

    fn raise_with(
        &mut self,
        rng: &mut impl Rng,
        roster: &[CrewMember],
        ts_ms: u64,
        odds: AlertOdds,
    ) -> Option<&Alert> {
        let kind = AlertKind::pick(rng, odds);
        let member = roster.choose(rng)?;
        let message = *kind.messages().choose(rng)?;

        let alert = Alert {
            id: self.next_id,
            kind,
            member: member.name.clone(),
            message,
            ts_ms,
        };
        self.next_id += 1;

        self.feed.push(alert);
        self.feed.newest()
    }

    /// Moves a live alert into the handled history. `None` if `id` is not
    /// live (already handled or pushed out of the feed).
    pub fn act(&mut self, id: u64, action: AlertAction, now_ms: u64) -> Option<&HandledAlert> {
        let alert = self.feed.take(|a| a.id == id)?;
        self.handled.push(HandledAlert {
            alert,
            action,
            at_ms: now_ms,
        });
        self.handled.newest()
    }

    pub fn alerts(&self) -> impl Iterator<Item = &Alert> {
        self.feed.iter()
    }

    /// Handled alerts, most recent action first.
    pub fn handled(&self) -> impl Iterator<Item = &HandledAlert> {
        self.handled.iter()
    }

    pub fn len(&self) -> usize {
        self.feed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feed.is_empty()
    }
}

// =========================
// Recommendations
// =========================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Clone, Copy, Debug)]
struct Template {
    title: &'static str,
    description: &'static str,
    priority: Priority,
}

const CATALOG: [Template; 5] = [
    Template {
        title: "Meditation Session Recommended",
        description: "30-minute mindfulness exercise to reduce cortisol levels",
        priority: Priority::High,
    },
    Template {
        title: "Social Interaction Time",
        description: "Schedule group activity to boost collective morale",
        priority: Priority::Medium,
    },
    Template {
        title: "Sleep Optimization",
        description: "Adjust cabin lighting 2 hours before rest period",
        priority: Priority::High,
    },
    Template {
        title: "Physical Exercise",
        description: "Light resistance training to improve mood indicators",
        priority: Priority::Medium,
    },
    Template {
        title: "Communication with Earth",
        description: "Video call with family to enhance emotional wellbeing",
        priority: Priority::Low,
    },
];

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Recommendation {
    pub id: u64,
    pub member: String,
    pub title: &'static str,
    pub description: &'static str,
    pub priority: Priority,
}

/// Current wellness suggestions, newest first.
#[derive(Clone, Debug)]
pub struct RecommendationFeed {
    feed: BoundedFeed<Recommendation>,
    next_id: u64,
}

impl Default for RecommendationFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl RecommendationFeed {
    pub fn new() -> Self {
        Self {
            feed: BoundedFeed::new(RECOMMENDATION_CAPACITY),
            next_id: 1,
        }
    }

    /// Starts from the first three catalog entries, each for a random member.
    pub fn seed(&mut self, rng: &mut impl Rng, roster: &[CrewMember]) {
        // Pushed in reverse so the first catalog entry ends up on top.
        for template in CATALOG.iter().take(RECOMMENDATION_CAPACITY).rev() {
            self.push_template(rng, roster, *template);
        }
    }

    /// Adds one recommendation drawn from the catalog. `None` if the roster is empty.
    pub fn suggest(&mut self, rng: &mut impl Rng, roster: &[CrewMember]) -> Option<&Recommendation> {
        let template = *CATALOG.choose(rng)?;
        self.push_template(rng, roster, template)
    }

    fn push_template(
        &mut self,
        rng: &mut impl Rng,
        roster: &[CrewMember],
        template: Template,
    ) -> Option<&Recommendation> {
        let member = roster.choose(rng)?;

        let rec = Recommendation {
            id: self.next_id,
            member: member.name.clone(),
            title: template.title,
            description: template.description,
            priority: template.priority,
        };
        self.next_id += 1;

        self.feed.push(rec);
        self.feed.newest()
    }

    pub fn recommendations(&self) -> impl Iterator<Item = &Recommendation> {
        self.feed.iter()
    }

    pub fn len(&self) -> usize {
        self.feed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::default_roster;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn bounded_feed_keeps_newest_first() {
        let mut feed = BoundedFeed::new(3);
        for i in 1..=5 {
            feed.push(i);
        }

        assert_eq!(feed.iter().copied().collect::<Vec<_>>(), vec![5, 4, 3]);
        assert_eq!(feed.newest(), Some(&5));
    }

    #[test]
    fn alert_feed_caps_at_five() {
        let mut rng = StdRng::seed_from_u64(1);
        let roster = default_roster();
        let mut feed = AlertFeed::new();

        feed.seed(&mut rng, &roster, 10_000_000);
        assert_eq!(feed.len(), 3);
        assert!(feed.alerts().all(|a| a.ts_ms <= 10_000_000 && a.ts_ms > 6_400_000));

        for t in 0..10 {
            let alert = feed.raise(&mut rng, &roster, 20_000_000 + t).unwrap();
            assert!(alert.kind.messages().contains(&alert.message));
        }

        assert_eq!(feed.len(), ALERT_CAPACITY);
        let ids: Vec<u64> = feed.alerts().map(|a| a.id).collect();
        assert_eq!(ids, vec![13, 12, 11, 10, 9]);
    }

    #[test]
    fn alert_kind_odds_cover_every_kind() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut seen = [0usize; 3];
        for _ in 0..2_000 {
            match AlertKind::pick(&mut rng, LIVE_ODDS) {
                AlertKind::Warning => seen[0] += 1,
                AlertKind::Info => seen[1] += 1,
                AlertKind::Success => seen[2] += 1,
            }
        }

        // Expected shares: 40% / 36% / 24%.
        assert!(seen.iter().all(|&n| n > 300), "skewed kinds: {seen:?}");
    }

    #[test]
    fn empty_roster_raises_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut alerts = AlertFeed::new();
        let mut recs = RecommendationFeed::new();

        assert!(alerts.raise(&mut rng, &[], 0).is_none());
        assert!(recs.suggest(&mut rng, &[]).is_none());
        assert!(alerts.is_empty());
        assert!(recs.is_empty());
    }

    #[test]
    fn recommendations_seed_from_catalog_head() {
        let mut rng = StdRng::seed_from_u64(2);
        let roster = default_roster();
        let mut feed = RecommendationFeed::new();

        feed.seed(&mut rng, &roster);
        let titles: Vec<_> = feed.recommendations().map(|r| r.title).collect();
        assert_eq!(
            titles,
            vec![
                "Meditation Session Recommended",
                "Social Interaction Time",
                "Sleep Optimization"
            ]
        );

        feed.suggest(&mut rng, &roster).unwrap();
        assert_eq!(feed.len(), RECOMMENDATION_CAPACITY);
        assert_eq!(feed.recommendations().next().map(|r| r.id), Some(4));
    }

    fn alert(id: u64, kind: AlertKind, member: &str) -> Alert {
        Alert {
            id,
            kind,
            member: member.into(),
            message: kind.messages()[0],
            ts_ms: 0,
        }
    }

    #[test]
    fn acting_moves_alert_to_history() {
        let mut rng = StdRng::seed_from_u64(4);
        let roster = default_roster();
        let mut feed = AlertFeed::new();
        feed.seed(&mut rng, &roster, 10_000_000);

        let target = feed.alerts().nth(1).map(|a| a.id).unwrap();
        let handled = feed.act(target, AlertAction::Snoozed, 10_000_500).unwrap();
        assert_eq!(handled.alert.id, target);
        assert_eq!(handled.action, AlertAction::Snoozed);
        assert_eq!(handled.at_ms, 10_000_500);

        assert_eq!(feed.len(), 2);
        assert!(feed.alerts().all(|a| a.id != target));

        let first = feed.alerts().next().map(|a| a.id).unwrap();
        feed.act(first, AlertAction::Acknowledged, 10_000_900).unwrap();
        let actions: Vec<_> = feed.handled().map(|h| h.action).collect();
        assert_eq!(actions, vec![AlertAction::Acknowledged, AlertAction::Snoozed]);
    }

    #[test]
    fn acting_on_unknown_or_handled_alert_does_nothing() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut feed = AlertFeed::new();
        feed.seed(&mut rng, &default_roster(), 10_000_000);

        assert!(feed.act(999, AlertAction::Assigned, 0).is_none());

        let id = feed.alerts().next().map(|a| a.id).unwrap();
        assert!(feed.act(id, AlertAction::Assigned, 0).is_some());
        assert!(feed.act(id, AlertAction::Assigned, 0).is_none());
        assert_eq!(feed.handled().count(), 1);
        assert_eq!(feed.len(), 2);
    }

    #[test]
    fn root_causes_by_member_then_kind() {
        assert_eq!(
            alert(1, AlertKind::Success, "Dr. Rodriguez").root_causes(),
            &["Medics check rest period log", "Review biometric scan"]
        );
        assert_eq!(
            alert(2, AlertKind::Warning, "Lt. Kim").root_causes(),
            &["Schedule group activity", "Assign meditation session"]
        );
        assert_eq!(alert(3, AlertKind::Info, "Lt. Kim").root_causes(), &["Monitor status"]);
    }

    #[test]
    fn context_only_for_wilson_warnings() {
        assert!(alert(1, AlertKind::Warning, "Dr. Wilson").context().is_some());
        assert!(alert(2, AlertKind::Info, "Dr. Wilson").context().is_none());
        assert!(alert(3, AlertKind::Warning, "Lt. Kim").context().is_none());
    }

    #[test]
    fn alert_serializes_lowercase_kind() {
        let alert = Alert {
            id: 1,
            kind: AlertKind::Warning,
            member: "Lt. Kim".into(),
            message: "Fatigue indicators rising",
            ts_ms: 0,
        };
        let json = serde_json::to_string(&alert).unwrap();
        assert!(json.contains("\"kind\":\"warning\""));
    }
}
