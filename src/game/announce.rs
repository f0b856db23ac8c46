//! Kill Announcements
//!
//! Template tables for the kill feed. Templates use named placeholders
//! (`{killer}`, `{victim}`, `{killer_color}`, `{victim_color}`, `{team}`,
//! `{n}`, `{total}`) and are picked with the injected seeded RNG.

use crate::core::rng::DeterministicRng;

/// Templates for kills credited to another player.
pub const KILL_TEMPLATES: [&str; 4] = [
    "<color={killer_color}>{killer}</color> killed <color={victim_color}>{victim}</color>",
    "<color={killer_color}>{killer}</color> took down <color={victim_color}>{victim}</color>",
    "<color={victim_color}>{victim}</color> was eliminated by <color={killer_color}>{killer}</color>",
    "<color={killer_color}>{killer}</color> outplayed <color={victim_color}>{victim}</color>",
];

/// Templates for suicides and deaths without a killer.
pub const SUICIDE_TEMPLATES: [&str; 3] = [
    "<color={victim_color}>{victim}</color> took the easy way out",
    "<color={victim_color}>{victim}</color> died",
    "<color={victim_color}>{victim}</color> had enough",
];

/// Capture announcement.
pub const CAPTURE_TEMPLATE: &str = "{team} captured {point}. {n}/{total}";

/// Team colors indexed by team; anything past the table renders white.
pub const TEAM_COLORS: [&str; 2] = ["#1D89CC", "#FF3E3E"];

/// Color for `team_index`.
pub fn team_color(team_index: Option<usize>) -> &'static str {
    team_index
        .and_then(|i| TEAM_COLORS.get(i).copied())
        .unwrap_or("#FFFFFF")
}

/// Replace every `{name}` in `template` with its value.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut text = template.to_string();
    for (name, value) in values {
        text = text.replace(&format!("{{{name}}}"), value);
    }
    text
}

/// One side of a kill as shown in the feed.
#[derive(Clone, Copy, Debug)]
pub struct Combatant<'a> {
    /// Player name
    pub name: &'a str,
    /// Player team
    pub team_index: Option<usize>,
}

/// Picks and fills kill-feed templates.
#[derive(Clone, Debug, Default)]
pub struct Announcer {
    rng: DeterministicRng,
}

impl Announcer {
    /// Create an announcer drawing from `rng`.
    pub fn new(rng: DeterministicRng) -> Self {
        Self { rng }
    }

    /// Kill-feed line for `victim`, credited to `killer` if present.
    pub fn kill_message(&mut self, victim: Combatant<'_>, killer: Option<Combatant<'_>>) -> String {
        let victim_color = team_color(victim.team_index);
        match killer {
            Some(killer) => {
                let template = self.rng.choose(&KILL_TEMPLATES).copied().unwrap_or(KILL_TEMPLATES[0]);
                fill(template, &[
                    ("killer", killer.name),
                    ("killer_color", team_color(killer.team_index)),
                    ("victim", victim.name),
                    ("victim_color", victim_color),
                ])
            }
            None => {
                let template = self.rng.choose(&SUICIDE_TEMPLATES).copied().unwrap_or(SUICIDE_TEMPLATES[0]);
                fill(template, &[("victim", victim.name), ("victim_color", victim_color)])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_named_placeholders() {
        let text = fill(CAPTURE_TEMPLATE, &[("team", "Attackers"), ("point", "Alpha"), ("n", "1"), ("total", "3")]);
        assert_eq!(text, "Attackers captured Alpha. 1/3");
    }

    #[test]
    fn test_fill_leaves_unknown_placeholders() {
        assert_eq!(fill("{a} {b}", &[("a", "x")]), "x {b}");
    }

    #[test]
    fn test_team_colors() {
        assert_eq!(team_color(Some(0)), TEAM_COLORS[0]);
        assert_eq!(team_color(Some(1)), TEAM_COLORS[1]);
        assert_eq!(team_color(Some(5)), "#FFFFFF");
        assert_eq!(team_color(None), "#FFFFFF");
    }

    #[test]
    fn test_kill_message_is_seed_deterministic() {
        let victim = Combatant { name: "bo", team_index: Some(1) };
        let killer = Combatant { name: "ana", team_index: Some(0) };

        let mut a = Announcer::new(DeterministicRng::new(7));
        let mut b = Announcer::new(DeterministicRng::new(7));
        for _ in 0..10 {
            let line = a.kill_message(victim, Some(killer));
            assert_eq!(line, b.kill_message(victim, Some(killer)));
            assert!(line.contains("ana") && line.contains("bo"));
            assert!(line.contains(TEAM_COLORS[0]) && line.contains(TEAM_COLORS[1]));
            assert!(!line.contains('{'));
        }
    }

    #[test]
    fn test_suicide_message_names_victim_only() {
        let mut announcer = Announcer::new(DeterministicRng::new(1));
        let line = announcer.kill_message(Combatant { name: "bo", team_index: None }, None);
        assert!(line.contains("bo"));
        assert!(!line.contains("{killer}"));
    }
}
