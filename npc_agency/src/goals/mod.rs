//! Goal Lifecycle Tracker - which of an NPC's goals are eligible to act on.
//!
//! Eligibility is recomputed from story state every tick; nothing here caches.

use story_rules::{hours_between, GameDate, Goal, GoalStatus, GoalTrigger, Npc, StoryState};

/// Check whether a goal's trigger holds.
///
/// Goals without a trigger are always triggered. A trigger evaluated without
/// story state never holds.
pub fn is_triggered(goal: &Goal, story: Option<&StoryState>) -> bool {
    let Some(trigger) = &goal.trigger else {
        return true;
    };
    let Some(story) = story else {
        return false;
    };

    match trigger {
        GoalTrigger::Flag { flag, op, value } => story
            .flag(flag)
            .is_some_and(|actual| op.holds(actual, value)),
        GoalTrigger::Beat { beat } => story.is_beat_complete(beat),
    }
}

/// Goals the NPC may currently pursue, in declared order.
///
/// Completed goals are excluded, active goals always included, and
/// background goals included only while triggered.
pub fn active_goals<'a>(npc: &'a Npc, story: Option<&StoryState>) -> Vec<&'a Goal> {
    npc.goals
        .iter()
        .filter(|goal| match goal.status {
            GoalStatus::Completed => false,
            GoalStatus::Active => true,
            GoalStatus::Background => is_triggered(goal, story),
        })
        .collect()
}

/// Stable sort by ascending priority; goals without priority go last.
pub fn by_priority(mut goals: Vec<&Goal>) -> Vec<&Goal> {
    goals.sort_by_key(|goal| (goal.priority.is_none(), goal.priority));
    goals
}

/// Check whether a goal should act on `current_date`.
///
/// The cooldown gate applies only when both a cooldown and a last-acted date
/// are present; the boundary is inclusive.
pub fn should_act_now(goal: &Goal, story: Option<&StoryState>, current_date: &GameDate) -> bool {
    if goal.is_completed() || !is_triggered(goal, story) {
        return false;
    }
    match (&goal.cooldown, &goal.last_acted) {
        (Some(cooldown), Some(last_acted)) => {
            hours_between(last_acted, current_date) >= cooldown.as_hours()
        }
        _ => true,
    }
}

pub fn find_goal<'a>(npc: &'a Npc, goal_id: &str) -> Option<&'a Goal> {
    npc.goal(goal_id)
}

/// Change a goal's status. Returns `false` if the NPC has no such goal.
pub fn update_goal_status(npc: &mut Npc, goal_id: &str, status: GoalStatus) -> bool {
    let Some(goal) = npc.goals.iter_mut().find(|g| g.id == goal_id) else {
        return false;
    };
    goal.status = status;
    tracing::debug!("Goal {} of {} -> {:?}", goal_id, npc.id, status);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use story_rules::{CompareOp, Cooldown, FlagValue};

    fn date(day: u32, year: u32) -> GameDate {
        GameDate::new(day, year).unwrap()
    }

    fn hull_below(threshold: i64) -> GoalTrigger {
        GoalTrigger::Flag {
            flag: "hull".into(),
            op: CompareOp::Lt,
            value: FlagValue::Int(threshold),
        }
    }

    #[test]
    fn test_untriggered_goal_always_triggered() {
        let goal = Goal::new("patrol");
        assert!(is_triggered(&goal, None));
        assert!(is_triggered(&goal, Some(&StoryState::new())));
    }

    #[test]
    fn test_trigger_without_story_fails_closed() {
        let goal = Goal::new("repair").with_trigger(hull_below(50));
        assert!(!is_triggered(&goal, None));
    }

    #[test]
    fn test_flag_and_beat_triggers() {
        let mut story = StoryState::new();
        let repair = Goal::new("repair").with_trigger(hull_below(50));
        let mourn = Goal::new("mourn").with_trigger(GoalTrigger::Beat {
            beat: "captain_died".into(),
        });

        assert!(!is_triggered(&repair, Some(&story)));
        story.set_flag("hull", 40i64);
        assert!(is_triggered(&repair, Some(&story)));

        assert!(!is_triggered(&mourn, Some(&story)));
        story.complete_beat("captain_died", None);
        assert!(is_triggered(&mourn, Some(&story)));
    }

    #[test]
    fn test_eq_trigger_matches_float_flags() {
        let goal = Goal::new("stand-down").with_trigger(GoalTrigger::Flag {
            flag: "alert".into(),
            op: CompareOp::Eq,
            value: FlagValue::Int(3),
        });
        let story: StoryState = serde_json::from_str(r#"{"flags": {"alert": 3.0}}"#).unwrap();

        assert!(is_triggered(&goal, Some(&story)));
    }

    #[test]
    fn test_active_goals_filters_by_status() {
        let story = StoryState::new();
        let npc = Npc::new("torres", "Torres")
            .with_goal(Goal::new("done").with_status(GoalStatus::Completed))
            .with_goal(Goal::new("sleeping").with_status(GoalStatus::Background).with_trigger(hull_below(50)))
            .with_goal(Goal::new("watch").with_status(GoalStatus::Background))
            .with_goal(Goal::new("work"));

        let ids: Vec<_> = active_goals(&npc, Some(&story)).iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["watch", "work"]);
    }

    #[test]
    fn test_by_priority_is_stable() {
        let a = Goal::new("a").with_priority(1);
        let b = Goal::new("b").with_priority(1);
        let c = Goal::new("c").with_priority(2);
        let none = Goal::new("none");

        let sorted = by_priority(vec![&none, &c, &a, &b]);
        let ids: Vec<_> = sorted.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "none"]);
    }

    #[test]
    fn test_cooldown_boundary_is_inclusive() {
        let goal = Goal::new("report")
            .with_cooldown(Cooldown::Hours(48))
            .with_last_acted(date(10, 2305));

        assert!(should_act_now(&goal, None, &date(12, 2305)));
        assert!(!should_act_now(&goal, None, &date(11, 2305)));
    }

    #[test]
    fn test_cooldown_in_days() {
        let goal = Goal::new("report")
            .with_cooldown(Cooldown::Days(3))
            .with_last_acted(date(364, 2305));

        assert!(!should_act_now(&goal, None, &date(1, 2306)));
        assert!(should_act_now(&goal, None, &date(2, 2306)));
    }

    #[test]
    fn test_cooldown_without_last_acted() {
        let goal = Goal::new("report").with_cooldown(Cooldown::Days(3));
        assert!(should_act_now(&goal, None, &date(1, 2305)));

        let done = Goal::new("report").with_status(GoalStatus::Completed);
        assert!(!should_act_now(&done, None, &date(1, 2305)));
    }

    #[test]
    fn test_update_goal_status() {
        let mut npc = Npc::new("torres", "Torres").with_goal(Goal::new("repair"));

        assert!(update_goal_status(&mut npc, "repair", GoalStatus::Completed));
        assert!(find_goal(&npc, "repair").unwrap().is_completed());
        assert!(!update_goal_status(&mut npc, "missing", GoalStatus::Active));
        assert!(find_goal(&npc, "missing").is_none());
    }
}
