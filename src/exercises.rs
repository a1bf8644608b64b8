//! Exercise definitions - the five tracked movements and their metric cards

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Exercises the pose backend knows how to count
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseKind {
    JumpingJacks,
    PushUps,
    SitUps,
    Plank,
    VerticalJump,
}

/// Static display metadata for an exercise
#[derive(Debug, Clone)]
pub struct ExerciseInfo {
    pub name: &'static str,
    pub emoji: &'static str,
    pub description: &'static str,
    pub instructions: &'static [&'static str],
}

/// What a card shows when the backend omitted its field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    Zero,
    Ready,
    No,
}

impl Fallback {
    pub fn text(&self) -> &'static str {
        match self {
            Fallback::Zero => "0",
            Fallback::Ready => "Ready",
            Fallback::No => "No",
        }
    }
}

/// One metric card in an exercise layout
#[derive(Debug, Clone, Copy)]
pub struct MetricField {
    pub key: &'static str,
    pub label: &'static str,
    pub unit: &'static str,
    pub fallback: Fallback,
}

const fn field(key: &'static str, label: &'static str, unit: &'static str, fallback: Fallback) -> MetricField {
    MetricField { key, label, unit, fallback }
}

const JUMPING_JACKS_SCHEMA: &[MetricField] = &[
    field("count", "Reps", "", Fallback::Zero),
    field("form_score", "Form Score", "%", Fallback::Zero),
    field("status", "Status", "", Fallback::Ready),
];

const PUSH_UPS_SCHEMA: &[MetricField] = &[
    field("count", "Reps", "", Fallback::Zero),
    field("arm_angle", "Arm Angle", "°", Fallback::Zero),
    field("body_angle", "Body Angle", "°", Fallback::Zero),
    field("form_score", "Form Score", "%", Fallback::Zero),
];

const SIT_UPS_SCHEMA: &[MetricField] = &[
    field("count", "Reps", "", Fallback::Zero),
    field("angle", "Torso Angle", "°", Fallback::Zero),
    field("status", "Status", "", Fallback::Ready),
];

const PLANK_SCHEMA: &[MetricField] = &[
    field("current_hold", "Current Hold", "s", Fallback::Zero),
    field("total_time", "Total Time", "s", Fallback::Zero),
    field("body_angle", "Body Angle", "°", Fallback::Zero),
    field("in_position", "In Position", "", Fallback::No),
];

const VERTICAL_JUMP_SCHEMA: &[MetricField] = &[
    field("current_height", "Current Height", "px", Fallback::Zero),
    field("max_height", "Max Height", "px", Fallback::Zero),
    field("jump_count", "Jumps", "", Fallback::Zero),
];

static JUMPING_JACKS: ExerciseInfo = ExerciseInfo {
    name: "Jumping Jacks",
    emoji: "🤸",
    description: "Full-body cardio. Counts a rep each time arms and legs open and close.",
    instructions: &[
        "Stand facing the camera, feet together, arms at your sides",
        "Jump while spreading your legs and raising both arms overhead",
        "Jump back to the starting position",
        "Keep a steady rhythm so both phases are detected",
    ],
};

static PUSH_UPS: ExerciseInfo = ExerciseInfo {
    name: "Push-ups",
    emoji: "💪",
    description: "Upper-body strength. Tracks elbow angle for reps and hip line for form.",
    instructions: &[
        "Turn side-on to the camera in a high plank, hands under shoulders",
        "Lower until your elbows bend below 90°",
        "Push back up until your arms are straight",
        "Keep shoulders, hips and knees in one line",
    ],
};

static SIT_UPS: ExerciseInfo = ExerciseInfo {
    name: "Sit-ups",
    emoji: "🎯",
    description: "Core endurance. Counts a rep from the torso angle at the hip.",
    instructions: &[
        "Lie side-on to the camera, knees bent, feet flat",
        "Curl your torso up until it passes 90° at the hip",
        "Lower back down under control",
    ],
};

static PLANK: ExerciseInfo = ExerciseInfo {
    name: "Plank",
    emoji: "🧱",
    description: "Isometric core hold. Times how long your body stays straight.",
    instructions: &[
        "Turn side-on to the camera on forearms and toes",
        "Keep shoulders, hips and ankles in a straight line",
        "Hold; the timer pauses whenever your hips sag or pike",
    ],
};

static VERTICAL_JUMP: ExerciseInfo = ExerciseInfo {
    name: "Vertical Jump",
    emoji: "🦘",
    description: "Explosive power. Measures hip rise above your standing baseline.",
    instructions: &[
        "Stand still facing the camera so the baseline can be set",
        "Dip and jump straight up as high as you can",
        "Land softly and settle before the next jump",
    ],
};

impl ExerciseKind {
    /// All exercises in shortcut order (keys 1-5)
    pub fn all() -> &'static [ExerciseKind] {
        &[
            ExerciseKind::JumpingJacks,
            ExerciseKind::PushUps,
            ExerciseKind::SitUps,
            ExerciseKind::Plank,
            ExerciseKind::VerticalJump,
        ]
    }

    /// Wire identifier used by the backend
    pub fn id(&self) -> &'static str {
        match self {
            ExerciseKind::JumpingJacks => "jumping_jacks",
            ExerciseKind::PushUps => "push_ups",
            ExerciseKind::SitUps => "sit_ups",
            ExerciseKind::Plank => "plank",
            ExerciseKind::VerticalJump => "vertical_jump",
        }
    }

    pub fn info(&self) -> &'static ExerciseInfo {
        match self {
            ExerciseKind::JumpingJacks => &JUMPING_JACKS,
            ExerciseKind::PushUps => &PUSH_UPS,
            ExerciseKind::SitUps => &SIT_UPS,
            ExerciseKind::Plank => &PLANK,
            ExerciseKind::VerticalJump => &VERTICAL_JUMP,
        }
    }

    /// Ordered card layout for this exercise
    pub fn schema(&self) -> &'static [MetricField] {
        match self {
            ExerciseKind::JumpingJacks => JUMPING_JACKS_SCHEMA,
            ExerciseKind::PushUps => PUSH_UPS_SCHEMA,
            ExerciseKind::SitUps => SIT_UPS_SCHEMA,
            ExerciseKind::Plank => PLANK_SCHEMA,
            ExerciseKind::VerticalJump => VERTICAL_JUMP_SCHEMA,
        }
    }

    /// Metric plotted on the progress chart
    pub fn trend_key(&self) -> &'static str {
        match self {
            ExerciseKind::JumpingJacks | ExerciseKind::PushUps | ExerciseKind::SitUps => "count",
            ExerciseKind::Plank => "current_hold",
            ExerciseKind::VerticalJump => "max_height",
        }
    }

    pub fn trend_label(&self) -> &'static str {
        match self {
            ExerciseKind::JumpingJacks | ExerciseKind::PushUps | ExerciseKind::SitUps => "Reps",
            ExerciseKind::Plank => "Hold (s)",
            ExerciseKind::VerticalJump => "Max height (px)",
        }
    }

    /// Exercise bound to a digit key, '1' through '5'
    pub fn from_shortcut(key: char) -> Option<ExerciseKind> {
        let index = key.to_digit(10)?.checked_sub(1)? as usize;
        Self::all().get(index).copied()
    }

    /// Digit key that selects this exercise
    pub fn shortcut(&self) -> char {
        let index = Self::all().iter().position(|k| k == self).unwrap_or(0);
        char::from(b'1' + index as u8)
    }
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ExerciseKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::all()
            .iter()
            .copied()
            .find(|k| k.id() == normalized)
            .ok_or_else(|| {
                let known: Vec<_> = Self::all().iter().map(|k| k.id()).collect();
                format!("unknown exercise '{}' (expected one of: {})", s, known.join(", "))
            })
    }
}
