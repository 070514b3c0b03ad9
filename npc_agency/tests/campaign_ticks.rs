use npc_agency::*;
use story_rules::*;

/// Applies a fixed flag change per action, the way a host's executor might.
struct ShipExecutor {
    performed: Vec<String>,
}

impl ActionExecutor for ShipExecutor {
    fn execute(&mut self, action: &ActionDefinition, ctx: ActionContext<'_>) -> ActionOutcome {
        self.performed.push(format!("{}:{}", ctx.npc.id, action.id));
        match action.id.as_str() {
            "repair-ship" => {
                let _ = Effect::increment("hull", 10i64).apply(ctx.story);
                ActionOutcome::success(format!("{} patched the hull", ctx.npc.name))
            }
            "fire-weapons" => ActionOutcome::failure("weapons offline"),
            _ => ActionOutcome::success("done"),
        }
    }
}

fn day(d: u32) -> GameDate {
    GameDate::new(d, 2305).unwrap()
}

fn crew() -> Vec<Npc> {
    let torres: Npc = serde_json::from_str(
        r#"{
            "id": "torres",
            "name": "Chief Torres",
            "role": "engineer",
            "goals": [
                {"id": "defend", "priority": 1, "status": "background",
                 "trigger": {"type": "beat", "beat": "boarded"},
                 "actions": ["fire-weapons"]},
                {"id": "repair", "priority": 2, "status": "background",
                 "trigger": {"type": "flag", "flag": "hull", "op": "lt", "value": 60},
                 "cooldown": {"days": 1},
                 "actions": ["repair-ship"]}
            ],
            "triggers": [
                {"id": "hull-stable", "once": true,
                 "condition": {"type": "flag", "flag": "hull_stable", "value": true},
                 "targets": {"npcs": ["vex"]},
                 "message": {"subject": "Hull", "body": "{npc} to {recipient}: hull holding on {date}."}}
            ]
        }"#,
    )
    .unwrap();

    let vex = Npc::new("vex", "Lieutenant Vex").with_role("gunner").with_trigger(
        WorldTrigger::new(
            "still-adrift",
            TriggerCondition::Time {
                after_beat: "engine_failure".into(),
                hours: 48,
            },
            "{npc}: two days adrift.",
        )
        .requiring("!rescued")
        .once(),
    );

    vec![torres, vex, Npc::new("cook", "Cook")]
}

#[test]
fn engineer_without_gunner_capabilities_is_unauthorized() {
    let mut engine = NarrativeEngine::with_defaults();
    let mut npcs = crew();
    let mut story = StoryState::starting_at(day(1));
    story.complete_beat("boarded", None);
    let mut executor = ShipExecutor { performed: Vec::new() };

    let report = engine.run_tick(&mut npcs, &mut story, &day(1), &mut executor);

    assert_eq!(report.agency_results.len(), 1);
    let result = &report.agency_results[0];
    assert_eq!(result.npc_id, "torres");
    assert_eq!(result.status, AgencyStatus::Unauthorized);
    assert_eq!(result.goal_id.as_deref(), Some("defend"));
    assert!(executor.performed.is_empty());
}

#[test]
fn repairs_respect_cooldown_across_ticks() {
    let mut engine = NarrativeEngine::with_defaults();
    let mut npcs = crew();
    let mut story = StoryState::starting_at(day(1));
    story.set_flag("hull", 40i64);
    let mut executor = ShipExecutor { performed: Vec::new() };

    for d in [1, 1, 2, 3] {
        engine.run_tick(&mut npcs, &mut story, &day(d), &mut executor);
    }

    assert_eq!(executor.performed.len(), 2);
    assert_eq!(story.flag("hull"), Some(&FlagValue::Int(60)));

    // Hull is no longer below 60, so the background goal goes quiet.
    let report = engine.run_tick(&mut npcs, &mut story, &day(10), &mut executor);
    assert!(report.agency_results.is_empty());
}

#[test]
fn time_trigger_fires_once_unless_rescued() {
    let mut engine = NarrativeEngine::with_defaults();
    let mut npcs = crew();
    let mut story = StoryState::starting_at(day(5));
    story.complete_beat("engine_failure", None);
    let mut executor = ShipExecutor { performed: Vec::new() };

    let early = engine.run_tick(&mut npcs, &mut story, &day(6), &mut executor);
    assert!(early.trigger_messages.is_empty());

    let due = engine.run_tick(&mut npcs, &mut story, &day(7), &mut executor);
    assert_eq!(due.trigger_messages.len(), 1);
    assert_eq!(due.trigger_messages[0].to, Recipient::Broadcast);
    assert_eq!(due.trigger_messages[0].body, "Lieutenant Vex: two days adrift.");

    let later = engine.run_tick(&mut npcs, &mut story, &day(8), &mut executor);
    assert!(later.trigger_messages.is_empty());

    engine.triggers_mut().reset("still-adrift");
    story.complete_beat("rescued", None);
    let rescued = engine.run_tick(&mut npcs, &mut story, &day(9), &mut executor);
    assert!(rescued.trigger_messages.is_empty());
}

#[test]
fn timed_repair_feeds_trigger_and_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = EngineConfig::from_toml_str(&format!(
        "[state]\ntrigger_state = {:?}\ntimed_action_state = {:?}\n",
        dir.path().join("trigger_state.json"),
        dir.path().join("timed_actions.json"),
    ))
    .unwrap();

    let mut npcs = crew();
    let mut story = StoryState::starting_at(day(1));
    let mut executor = ShipExecutor { performed: Vec::new() };
    let overhaul = TimedActionDefinition::new("overhaul", "torres", Duration { hours: Some(12), days: Some(1) })
        .with_effect(Effect::set("hull_stable", true));

    let mut engine = NarrativeEngine::new(&config);
    assert!(engine.start_timed_action(&overhaul, &day(1)).is_some());
    assert!(engine.advance_timed_actions(&mut story, 24).is_empty());
    drop(engine);

    let mut engine = NarrativeEngine::new(&config);
    let progress = engine.timed_actions().progress("overhaul").unwrap();
    assert_eq!(progress.remaining_hours, 12);

    let completed = engine.advance_timed_actions(&mut story, 12);
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].completed_on, day(2));

    let report = engine.run_tick(&mut npcs, &mut story, &day(2), &mut executor);
    assert_eq!(report.trigger_messages.len(), 1);
    let message = &report.trigger_messages[0];
    assert_eq!(message.to, Recipient::Npc("vex".into()));
    assert_eq!(message.body, "Chief Torres to vex: hull holding on 2305-002.");

    let restarted = NarrativeEngine::new(&config);
    assert!(restarted.triggers().has_fired("hull-stable"));
    assert!(restarted.timed_actions().active().is_empty());
}

#[test]
fn cancelled_action_never_applies_effects() {
    let mut engine = NarrativeEngine::with_defaults();
    let mut story = StoryState::new();
    let sabotage = TimedActionDefinition::new("sabotage", "vex", Duration::hours(4))
        .with_effect(Effect::decrement("hull", 30i64));

    engine.start_timed_action(&sabotage, &day(1));
    engine.advance_timed_actions(&mut story, 2);
    assert!(engine.cancel_timed_action("sabotage"));
    assert!(!engine.cancel_timed_action("sabotage"));

    assert!(engine.advance_timed_actions(&mut story, 10).is_empty());
    assert!(story.flag("hull").is_none());
    assert!(engine.timed_actions().active_for("vex").is_empty());
}
