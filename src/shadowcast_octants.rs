use coord_2d::Coord;

/// Maps (lateral, depth) offsets within one eighth of the plane onto map
/// coordinates. Depth grows away from the centre along the primary axis and
/// lateral runs from 0 (on the axis) to depth (on the diagonal).
pub trait Octant {
    /// Map row or column reached at `depth`, or `None` once off the map.
    fn depth_index(&self, centre: Coord, depth: i32) -> Option<i32>;
    fn make_coord(&self, centre: Coord, lateral_offset: i32, depth_index: i32) -> Coord;
    /// Largest lateral offset still on the map.
    fn lateral_max(&self, centre: Coord) -> i32;
}

pub struct TopLeft;
pub struct LeftTop;
pub struct TopRight {
    pub width: i32,
}
pub struct RightTop {
    pub width: i32,
}
pub struct BottomLeft {
    pub height: i32,
}
pub struct LeftBottom {
    pub height: i32,
}
pub struct BottomRight {
    pub width: i32,
    pub height: i32,
}
pub struct RightBottom {
    pub width: i32,
    pub height: i32,
}

macro_rules! some_if {
    ($value:expr, $condition:expr) => {
        if $condition {
            Some($value)
        } else {
            None
        }
    };
}

impl Octant for TopLeft {
    fn depth_index(&self, centre: Coord, depth: i32) -> Option<i32> {
        let index = centre.y - depth;
        some_if!(index, index >= 0)
    }
    fn make_coord(&self, centre: Coord, lateral_offset: i32, depth_index: i32) -> Coord {
        Coord::new(centre.x - lateral_offset, depth_index)
    }
    fn lateral_max(&self, centre: Coord) -> i32 {
        centre.x
    }
}

impl Octant for LeftTop {
    fn depth_index(&self, centre: Coord, depth: i32) -> Option<i32> {
        let index = centre.x - depth;
        some_if!(index, index >= 0)
    }
    fn make_coord(&self, centre: Coord, lateral_offset: i32, depth_index: i32) -> Coord {
        Coord::new(depth_index, centre.y - lateral_offset)
    }
    fn lateral_max(&self, centre: Coord) -> i32 {
        centre.y
    }
}

impl Octant for TopRight {
    fn depth_index(&self, centre: Coord, depth: i32) -> Option<i32> {
        let index = centre.y - depth;
        some_if!(index, index >= 0)
    }
    fn make_coord(&self, centre: Coord, lateral_offset: i32, depth_index: i32) -> Coord {
        Coord::new(centre.x + lateral_offset, depth_index)
    }
    fn lateral_max(&self, centre: Coord) -> i32 {
        self.width - centre.x - 1
    }
}

impl Octant for RightTop {
    fn depth_index(&self, centre: Coord, depth: i32) -> Option<i32> {
        let index = centre.x + depth;
        some_if!(index, index < self.width)
    }
    fn make_coord(&self, centre: Coord, lateral_offset: i32, depth_index: i32) -> Coord {
        Coord::new(depth_index, centre.y - lateral_offset)
    }
    fn lateral_max(&self, centre: Coord) -> i32 {
        centre.y
    }
}

impl Octant for BottomLeft {
    fn depth_index(&self, centre: Coord, depth: i32) -> Option<i32> {
        let index = centre.y + depth;
        some_if!(index, index < self.height)
    }
    fn make_coord(&self, centre: Coord, lateral_offset: i32, depth_index: i32) -> Coord {
        Coord::new(centre.x - lateral_offset, depth_index)
    }
    fn lateral_max(&self, centre: Coord) -> i32 {
        centre.x
    }
}

impl Octant for LeftBottom {
    fn depth_index(&self, centre: Coord, depth: i32) -> Option<i32> {
        let index = centre.x - depth;
        some_if!(index, index >= 0)
    }
    fn make_coord(&self, centre: Coord, lateral_offset: i32, depth_index: i32) -> Coord {
        Coord::new(depth_index, centre.y + lateral_offset)
    }
    fn lateral_max(&self, centre: Coord) -> i32 {
        self.height - centre.y - 1
    }
}

impl Octant for BottomRight {
    fn depth_index(&self, centre: Coord, depth: i32) -> Option<i32> {
        let index = centre.y + depth;
        some_if!(index, index < self.height)
    }
    fn make_coord(&self, centre: Coord, lateral_offset: i32, depth_index: i32) -> Coord {
        Coord::new(centre.x + lateral_offset, depth_index)
    }
    fn lateral_max(&self, centre: Coord) -> i32 {
        self.width - centre.x - 1
    }
}

impl Octant for RightBottom {
    fn depth_index(&self, centre: Coord, depth: i32) -> Option<i32> {
        let index = centre.x + depth;
        some_if!(index, index < self.width)
    }
    fn make_coord(&self, centre: Coord, lateral_offset: i32, depth_index: i32) -> Coord {
        Coord::new(depth_index, centre.y + lateral_offset)
    }
    fn lateral_max(&self, centre: Coord) -> i32 {
        self.height - centre.y - 1
    }
}
