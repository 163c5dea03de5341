use crate::grid::{in_bounds, InputGrid};
use crate::shadowcast_octants::*;
use coord_2d::Coord;
use num_traits::Zero;
use std::cmp;
use std::mem;

/// A slope from the centre, stored as `lateral / depth` in half-cell units
/// so that cell edges stay integral.
#[derive(Debug, Clone, Copy)]
struct Gradient {
    lateral: i32,
    depth: i32,
}

impl Gradient {
    fn new(lateral: i32, depth: i32) -> Self {
        Self { lateral, depth }
    }
}

struct StaticParams<'a, In: InputGrid> {
    centre: Coord,
    vision_distance_squared: i32,
    input_grid: &'a In,
}

/// One unobstructed wedge of the current octant, to be scanned at `depth`.
#[derive(Clone, Debug)]
struct ScanParams<Visibility> {
    min_gradient: Gradient,
    max_gradient: Gradient,
    depth: i32,
    visibility: Visibility,
}

impl<Visibility> ScanParams<Visibility> {
    fn with_visibility(visibility: Visibility) -> Self {
        Self {
            min_gradient: Gradient::new(0, 1),
            max_gradient: Gradient::new(1, 1),
            depth: 1,
            visibility,
        }
    }
}

fn scan<In, O, F>(
    octant: &O,
    next: &mut Vec<ScanParams<In::Visibility>>,
    params: ScanParams<In::Visibility>,
    static_params: &StaticParams<In>,
    f: &mut F,
) where
    F: FnMut(Coord),
    In: InputGrid,
    O: Octant,
{
    let ScanParams {
        mut min_gradient,
        max_gradient,
        depth,
        visibility,
    } = params;

    let depth_index = match octant.depth_index(static_params.centre, depth) {
        Some(depth_index) => depth_index,
        None => return,
    };

    let front_gradient_depth = depth * 2 - 1;
    let back_gradient_depth = front_gradient_depth + 2;

    // first cell touched by the min gradient at the front of the row
    let double_start_num = min_gradient.depth + front_gradient_depth * min_gradient.lateral;
    let lateral_min = double_start_num / (2 * min_gradient.depth);

    // last cell whose near edge lies strictly inside the max gradient at the back of the row
    let double_stop_num = max_gradient.depth + back_gradient_depth * max_gradient.lateral;
    let stop_denom = 2 * max_gradient.depth;
    let lateral_max = if double_stop_num % stop_denom == 0 {
        (double_stop_num - 1) / stop_denom
    } else {
        double_stop_num / stop_denom
    };
    let lateral_max = cmp::min(lateral_max, octant.lateral_max(static_params.centre));

    let mut prev_visibility: In::Visibility = Zero::zero();
    let mut prev_opaque = false;

    for lateral_index in lateral_min..=lateral_max {
        let coord = octant.make_coord(static_params.centre, lateral_index, depth_index);
        let opacity = match static_params.input_grid.get_opacity(coord) {
            Some(opacity) => opacity,
            None => break,
        };

        let dx = coord.x - static_params.centre.x;
        let dy = coord.y - static_params.centre.y;
        let in_range = dx * dx + dy * dy < static_params.vision_distance_squared;

        let (cur_visibility, cur_opaque) = if visibility > opacity {
            (visibility - opacity, false)
        } else {
            (Zero::zero(), true)
        };

        if lateral_index != lateral_min && cur_visibility != prev_visibility {
            // Light getting dimmer is cut off at the back of the row,
            // light getting brighter starts at the front.
            let gradient_depth = if cur_visibility < prev_visibility {
                back_gradient_depth
            } else {
                front_gradient_depth
            };
            let gradient = Gradient::new(lateral_index * 2 - 1, gradient_depth);

            if !prev_opaque && in_range {
                next.push(ScanParams {
                    min_gradient,
                    max_gradient: gradient,
                    depth: depth + 1,
                    visibility: prev_visibility,
                });
            }
            min_gradient = gradient;
        }

        if lateral_index == lateral_max && !cur_opaque && in_range {
            next.push(ScanParams {
                min_gradient,
                max_gradient,
                depth: depth + 1,
                visibility: cur_visibility,
            });
        }

        if in_range {
            f(coord);
        }

        prev_visibility = cur_visibility;
        prev_opaque = cur_opaque;
    }
}

/// Scratch space for recursive shadowcasting. Reusing a context between
/// observers saves reallocating its queues.
#[derive(Clone, Debug)]
pub struct ShadowcastContext<Visibility> {
    queue: Vec<ScanParams<Visibility>>,
    queue_swap: Vec<ScanParams<Visibility>>,
}

impl<Visibility> Default for ShadowcastContext<Visibility> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Visibility> ShadowcastContext<Visibility> {
    pub fn new() -> Self {
        Self {
            queue: Vec::new(),
            queue_swap: Vec::new(),
        }
    }

    fn observe_octant<In, O, F>(&mut self, octant: O, static_params: &StaticParams<In>, f: &mut F)
    where
        F: FnMut(Coord),
        In: InputGrid<Visibility = Visibility>,
        O: Octant,
    {
        self.queue.clear();
        self.queue_swap.clear();
        self.queue
            .push(ScanParams::with_visibility(In::initial_visibility()));

        while !self.queue.is_empty() {
            for params in self.queue.drain(..) {
                scan(&octant, &mut self.queue_swap, params, static_params, f);
            }
            mem::swap(&mut self.queue, &mut self.queue_swap);
        }
    }

    /// Calls `f` with every cell visible from `coord` within `distance`,
    /// including `coord` itself. Cells on an octant boundary may be reported
    /// more than once. Nothing is reported if `coord` is off the map.
    pub fn for_each<In, F>(&mut self, coord: Coord, input_grid: &In, distance: u32, mut f: F)
    where
        In: InputGrid<Visibility = Visibility>,
        F: FnMut(Coord),
    {
        let size = input_grid.size();
        if !in_bounds(coord, size) {
            return;
        }
        f(coord);

        let width = size.width() as i32;
        let height = size.height() as i32;
        let distance = cmp::min(distance, i32::MAX as u32 / 2) as i64;
        let params = StaticParams {
            centre: coord,
            vision_distance_squared: cmp::min(distance * distance, i32::MAX as i64) as i32,
            input_grid,
        };

        self.observe_octant(TopLeft, &params, &mut f);
        self.observe_octant(LeftTop, &params, &mut f);
        self.observe_octant(TopRight { width }, &params, &mut f);
        self.observe_octant(RightTop { width }, &params, &mut f);
        self.observe_octant(BottomLeft { height }, &params, &mut f);
        self.observe_octant(LeftBottom { height }, &params, &mut f);
        self.observe_octant(BottomRight { width, height }, &params, &mut f);
        self.observe_octant(RightBottom { width, height }, &params, &mut f);
    }
}
