// components.rs
use crate::mask::Mask;
use bevy::prelude::*;

#[derive(Component)]
pub struct Player {
    pub speed: f32,
    pub sprint_multiplier: f32,
    /// Per-tick movement requested by input, before speed is applied.
    pub direction: Vec2,
    pub sprinting: bool,
}

#[derive(Component)]
pub struct Enemy {
    /// Pixels per tick.
    pub velocity: Vec2,
    /// Already scored as a near miss.
    pub counted: bool,
}

/// The two collision masks carried by the player: the body itself and the
/// larger near-miss area around it.
#[derive(Component)]
pub struct Hitboxes {
    pub normal: Mask,
    pub point: Mask,
}

impl Hitboxes {
    pub fn new(size: u32, graze_margin: u32) -> Self {
        let point = size + graze_margin * 2;
        Self {
            normal: Mask::full(size, size),
            point: Mask::full(point, point),
        }
    }
}

#[derive(Component)]
pub struct Body(pub Mask);

/// Player and enemies. These outlive the Playing scene so the result
/// screen can show where the run ended.
#[derive(Component)]
pub struct GameplayEntity;

#[derive(Component)]
pub struct HudTimeText;

#[derive(Component)]
pub struct HudActionText;

/// Status message line shown on the menu and result screens.
#[derive(Component)]
pub struct StatusText;

#[derive(Component)]
pub struct StudentIdText;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonAction {
    Start,
    Restart,
    Help,
    Menu,
    Quit,
}

#[derive(Component)]
pub struct MenuButton {
    pub action: ButtonAction,
    /// Set on press, consumed on release.
    pub armed: bool,
}

impl MenuButton {
    pub fn new(action: ButtonAction) -> Self {
        Self {
            action,
            armed: false,
        }
    }
}

/// Normal, hovered and pressed fill colours.
#[derive(Component, Clone, Copy)]
pub struct ButtonPalette {
    pub normal: Color,
    pub hovered: Color,
    pub pressed: Color,
}

/// Text that counts up from zero to `target` over `duration` seconds.
#[derive(Component)]
pub struct CountUp {
    pub label: &'static str,
    pub target: u32,
    pub elapsed: f32,
    pub duration: f32,
}

impl CountUp {
    pub fn new(label: &'static str, target: u32, duration: f32) -> Self {
        Self {
            label,
            target,
            elapsed: 0.0,
            duration,
        }
    }

    pub fn shown(&self) -> u32 {
        if self.duration <= 0.0 || self.elapsed >= self.duration {
            return self.target;
        }
        (self.target as f32 * (self.elapsed / self.duration)) as u32
    }
}

/// UI root that slides in from the right when its scene opens.
#[derive(Component)]
pub struct SlideIn {
    pub from: f32,
    pub elapsed: f32,
    pub duration: f32,
}

impl SlideIn {
    pub fn new(from: f32, duration: f32) -> Self {
        Self {
            from,
            elapsed: 0.0,
            duration,
        }
    }

    /// Current horizontal offset in pixels, easing out to zero.
    pub fn offset(&self) -> f32 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        let eased = 1.0 - (1.0 - t).powi(3);
        self.from * (1.0 - eased)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_up_reaches_target() {
        let mut c = CountUp::new("Time", 1000, 1.0);
        assert_eq!(c.shown(), 0);
        c.elapsed = 0.5;
        assert_eq!(c.shown(), 500);
        c.elapsed = 3.0;
        assert_eq!(c.shown(), 1000);
    }

    #[test]
    fn slide_in_ends_at_rest() {
        let mut s = SlideIn::new(800.0, 0.25);
        assert_eq!(s.offset(), 800.0);
        s.elapsed = 0.125;
        assert!(s.offset() > 0.0 && s.offset() < 400.0);
        s.elapsed = 1.0;
        assert_eq!(s.offset(), 0.0);
    }

    #[test]
    fn point_hitbox_surrounds_body() {
        let h = Hitboxes::new(10, 10);
        assert_eq!(h.normal.size(), UVec2::new(10, 10));
        assert_eq!(h.point.size(), UVec2::new(30, 30));
    }
}
