//! Built-in crew roles and action catalogue.

/// Capability tags granted by each built-in role.
pub const DEFAULT_ROLES: &[(&str, &[&str])] = &[
    ("captain", &["can_command", "can_communicate", "can_navigate"]),
    ("engineer", &["can_repair", "can_communicate"]),
    ("gunner", &["can_fire_weapons", "can_target"]),
    ("pilot", &["can_navigate", "can_communicate"]),
    ("medic", &["can_heal", "can_communicate"]),
    ("scientist", &["can_scan", "can_analyze"]),
    ("communications", &["can_communicate", "can_scan"]),
];

/// Built-in actions and the capability tags each requires.
pub const DEFAULT_ACTIONS: &[(&str, &[&str])] = &[
    ("repair-ship", &["can_repair"]),
    ("fire-weapons", &["can_fire_weapons", "can_target"]),
    ("send-message", &[]),
    ("scan-area", &["can_scan"]),
    ("plot-course", &["can_navigate"]),
    ("treat-wounded", &["can_heal"]),
    ("issue-orders", &["can_command"]),
];
