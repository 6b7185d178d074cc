//! Built-in exercise catalog seeded into a fresh state.
//!
//! Bump [`PRESET_VERSION`] whenever the list changes; seeding runs once per
//! version and only inserts names that are not already present.

use super::Category;

pub const PRESET_VERSION: &str = "2026-02-07-v2";

/// A catalog row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetExercise {
    pub name: &'static str,
    /// Name the same preset was stored under by earlier releases.
    pub legacy_name: &'static str,
    pub category: Category,
}

impl PresetExercise {
    /// Whether `name` (already lowercased and trimmed) is this preset.
    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase() == needle || self.legacy_name == needle
    }
}

const fn preset(name: &'static str, legacy_name: &'static str, category: Category) -> PresetExercise {
    PresetExercise {
        name,
        legacy_name,
        category,
    }
}

static CATALOG: &[PresetExercise] = &[
    preset("Bench Press", "平板臥推", Category::Chest),
    preset("Incline Bench Press", "上斜臥推", Category::Chest),
    preset("Dumbbell Bench Press", "啞鈴臥推", Category::Chest),
    preset("Push-up", "伏地挺身", Category::Chest),
    preset("Dip", "雙槓撐體", Category::Chest),
    preset("Barbell Row", "槓鈴划船", Category::Back),
    preset("Dumbbell Row", "啞鈴划船", Category::Back),
    preset("Seated Cable Row", "坐姿划船", Category::Back),
    preset("Lat Pulldown", "高位下拉", Category::Back),
    preset("Pull-up", "引體向上", Category::Back),
    preset("Chin-up", "反手引體向上", Category::Back),
    preset("Face Pull", "面拉", Category::Back),
    preset("Squat", "深蹲", Category::Legs),
    preset("Front Squat", "前蹲舉", Category::Legs),
    preset("Bulgarian Split Squat", "保加利亞分腿蹲", Category::Legs),
    preset("Lunge", "弓箭步", Category::Legs),
    preset("Leg Press", "腿推", Category::Legs),
    preset("Leg Curl", "腿後勾", Category::Legs),
    preset("Leg Extension", "腿伸展", Category::Legs),
    preset("Calf Raise", "小腿提踵", Category::Legs),
    preset("Overhead Press", "肩推", Category::Shoulders),
    preset("Dumbbell Shoulder Press", "啞鈴肩推", Category::Shoulders),
    preset("Lateral Raise", "側平舉", Category::Shoulders),
    preset("Rear Delt Fly", "後三角飛鳥", Category::Shoulders),
    preset("Barbell Curl", "槓鈴彎舉", Category::Arms),
    preset("Dumbbell Curl", "啞鈴彎舉", Category::Arms),
    preset("Triceps Pushdown", "三頭下壓", Category::Arms),
    preset("Skull Crusher", "仰臥臂屈伸", Category::Arms),
    preset("Romanian Deadlift", "羅馬尼亞硬舉", Category::Glutes),
    preset("Deadlift", "硬舉", Category::Glutes),
    preset("Sumo Deadlift", "相撲硬舉", Category::Glutes),
    preset("Hip Thrust", "臀推", Category::Glutes),
    preset("Treadmill Jog", "跑步機慢跑", Category::Cardio),
    preset("Indoor Cycling", "室內單車", Category::Cardio),
    preset("Rowing Machine", "划船機", Category::Cardio),
    preset("Jump Rope", "跳繩", Category::Cardio),
];

/// The ordered preset list.
pub fn catalog() -> &'static [PresetExercise] {
    CATALOG
}

/// Category of the preset with this name (case-insensitive, current or
/// legacy name), if any.
pub fn infer_category(name: &str) -> Option<Category> {
    find(name).map(|p| p.category)
}

/// The preset stored under `name`, current or legacy.
pub fn find(name: &str) -> Option<&'static PresetExercise> {
    let needle = name.trim().to_lowercase();
    CATALOG.iter().find(|p| p.matches(&needle))
}
