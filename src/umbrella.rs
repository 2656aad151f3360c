//! Umbrella projects: single-expansion state and the radial, collision-avoiding
//! layout of their sub-projects.

use crate::geometry::{Rect, Size};
use crate::random::RandomSource;
use crate::ElementId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UmbrellaTransition {
    Expanded {
        umbrella: ElementId,
        collapsed: Option<ElementId>,
    },
    Collapsed {
        umbrella: ElementId,
    },
}

/// At most one umbrella is expanded at a time.
#[derive(Debug, Default)]
pub struct UmbrellaState {
    expanded: Option<ElementId>,
}

impl UmbrellaState {
    pub fn expanded(&self) -> Option<ElementId> {
        self.expanded
    }

    pub fn toggle(&mut self, umbrella: ElementId) -> UmbrellaTransition {
        match self.expanded {
            Some(current) if current == umbrella => {
                self.expanded = None;
                UmbrellaTransition::Collapsed { umbrella }
            }
            previous => {
                self.expanded = Some(umbrella);
                UmbrellaTransition::Expanded {
                    umbrella,
                    collapsed: previous,
                }
            }
        }
    }

    pub fn collapse(&mut self) -> Option<ElementId> {
        self.expanded.take()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutParams {
    pub default_base_radius: f64,
    /// Clearance between the umbrella's edge and a sub-project's centre.
    pub parent_margin: f64,
    pub radius_variation: f64,
    pub angle_variation_deg: f64,
    pub padding: f64,
    pub max_attempts: u32,
    /// Attempts after this many may leave the viewport.
    pub viewport_attempts: u32,
    pub fallback_size: Size,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            default_base_radius: 150.0,
            parent_margin: 70.0,
            radius_variation: 40.0,
            angle_variation_deg: 25.0,
            padding: 15.0,
            max_attempts: 50,
            viewport_attempts: 40,
            fallback_size: Size::new(120.0, 30.0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SubPlacement {
    /// Offset of the sub-project's centre from the umbrella's centre.
    pub offset_x: f64,
    pub offset_y: f64,
    /// Padded box in viewport space used for later collision checks.
    pub bounds: Rect,
    /// False when every attempt collided and the first one was kept.
    pub collision_free: bool,
}

impl SubPlacement {
    pub fn css_x(&self) -> String {
        format!("{}px", self.offset_x)
    }

    pub fn css_y(&self) -> String {
        format!("{}px", self.offset_y)
    }
}

pub fn base_radius(umbrella: Rect, params: &LayoutParams) -> f64 {
    let parent_radius = umbrella.width().max(umbrella.height()) / 2.0;
    let min_distance = parent_radius + params.parent_margin;
    params
        .default_base_radius
        .max(min_distance + params.radius_variation)
}

/// Lays out `sub_sizes.len()` sub-projects around `umbrella`, evenly spaced
/// from the top and jittered until each padded box clears `obstacles`, the
/// siblings placed before it and (for the early attempts) the viewport.
pub fn place_sub_projects<R: RandomSource + ?Sized>(
    umbrella: Rect,
    sub_sizes: &[Size],
    obstacles: &[Rect],
    viewport: Size,
    rng: &mut R,
    params: &LayoutParams,
) -> Vec<SubPlacement> {
    let count = sub_sizes.len();
    let radius = base_radius(umbrella, params);
    let (cx, cy) = umbrella.center();
    let mut placed: Vec<SubPlacement> = Vec::with_capacity(count);

    for (index, measured) in sub_sizes.iter().enumerate() {
        let size = Size::new(
            nonzero_or(measured.width, params.fallback_size.width),
            nonzero_or(measured.height, params.fallback_size.height),
        );
        let padded = |x: f64, y: f64| Rect::centered(cx + x, cy + y, size).inflate(params.padding);
        let base_angle = -90.0 + (360.0 / count as f64) * index as f64;

        let mut fallback: Option<(f64, f64)> = None;
        let mut chosen: Option<(f64, f64)> = None;

        for attempt in 0..params.max_attempts {
            let widen = attempt as f64 * 2.0;
            let angle_var = params.angle_variation_deg + widen;
            let radius_var = params.radius_variation + widen;
            let angle = base_angle + (rng.next_unit() - 0.5) * angle_var * 2.0;
            let r = radius + (rng.next_unit() - 0.5) * radius_var * 2.0;
            let rad = angle.to_radians();
            let (x, y) = (rad.cos() * r, rad.sin() * r);

            let candidate = padded(x, y);
            let blocked = obstacles.iter().any(|obs| candidate.overlaps(obs))
                || placed.iter().any(|prev| candidate.overlaps(&prev.bounds))
                || (attempt < params.viewport_attempts && !candidate.fits_within(viewport));

            if !blocked {
                chosen = Some((x, y));
                break;
            }
            if fallback.is_none() {
                fallback = Some((x, y));
            }
        }

        let collision_free = chosen.is_some();
        let (x, y) = chosen.or(fallback).unwrap_or((0.0, -radius));
        placed.push(SubPlacement {
            offset_x: x,
            offset_y: y,
            bounds: padded(x, y),
            collision_free,
        });
    }
    placed
}

fn nonzero_or(value: f64, fallback: f64) -> f64 {
    if value > 0.0 {
        value
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn centered_rng() -> impl FnMut() -> f64 {
        || 0.5
    }

    #[test]
    fn toggling_switches_single_expansion() {
        let mut state = UmbrellaState::default();
        let a = ElementId(1);
        let b = ElementId(4);
        assert_eq!(
            state.toggle(a),
            UmbrellaTransition::Expanded {
                umbrella: a,
                collapsed: None
            }
        );
        assert_eq!(
            state.toggle(b),
            UmbrellaTransition::Expanded {
                umbrella: b,
                collapsed: Some(a)
            }
        );
        assert_eq!(state.toggle(b), UmbrellaTransition::Collapsed { umbrella: b });
        assert_eq!(state.expanded(), None);
        assert_eq!(state.collapse(), None);
    }

    #[test]
    fn radius_grows_with_parent() {
        let params = LayoutParams::default();
        assert_eq!(base_radius(Rect::from_xywh(0.0, 0.0, 60.0, 20.0), &params), 150.0);
        assert_eq!(
            base_radius(Rect::from_xywh(0.0, 0.0, 200.0, 20.0), &params),
            210.0
        );
    }

    #[test]
    fn unjittered_layout_is_evenly_spaced_from_top() {
        let umbrella = Rect::from_xywh(450.0, 450.0, 100.0, 100.0);
        let sizes = vec![Size::new(60.0, 20.0); 4];
        let mut rng = centered_rng();
        let placements = place_sub_projects(
            umbrella,
            &sizes,
            &[],
            Size::new(1000.0, 1000.0),
            &mut rng,
            &LayoutParams::default(),
        );
        assert_eq!(placements.len(), 4);
        let top = placements[0];
        assert!(top.collision_free);
        assert!(top.offset_x.abs() < 1e-9);
        assert!((top.offset_y + 160.0).abs() < 1e-9);
        let right = placements[1];
        assert!((right.offset_x - 160.0).abs() < 1e-9);
    }

    #[test]
    fn zero_sized_items_use_fallback_box() {
        let umbrella = Rect::from_xywh(450.0, 450.0, 100.0, 30.0);
        let mut rng = centered_rng();
        let placements = place_sub_projects(
            umbrella,
            &[Size::default()],
            &[],
            Size::new(1000.0, 1000.0),
            &mut rng,
            &LayoutParams::default(),
        );
        let bounds = placements[0].bounds;
        assert_eq!(bounds.width(), 150.0);
        assert_eq!(bounds.height(), 60.0);
    }

    #[test]
    fn exhausted_attempts_keep_first_candidate() {
        let umbrella = Rect::from_xywh(450.0, 450.0, 100.0, 100.0);
        let wall = Rect::new(-10_000.0, -10_000.0, 10_000.0, 10_000.0);
        let mut rng = centered_rng();
        let placements = place_sub_projects(
            umbrella,
            &[Size::new(60.0, 20.0)],
            &[wall],
            Size::new(1000.0, 1000.0),
            &mut rng,
            &LayoutParams::default(),
        );
        assert!(!placements[0].collision_free);
        assert!((placements[0].offset_y + 160.0).abs() < 1e-9);
    }
}
