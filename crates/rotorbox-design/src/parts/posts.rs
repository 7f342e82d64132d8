//! Standoff posts for a board's 2x2 mounting-hole pattern

use crate::params::BoardSpec;
use glam::{DVec2, DVec3};
use rotorbox_core::Result;
use rotorbox_core::sdf::{SdfExt, SdfNode, cylinder, union};

/// Wider collar at the base of each post
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shoulder {
    pub height: f64,
    pub diameter: f64,
}

/// Four posts standing on z = 0, centered on the board origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostLayout {
    pub spacing_x: f64,
    pub spacing_y: f64,
    pub post_diameter: f64,
    pub post_height: f64,
    pub shoulder: Option<Shoulder>,
}

impl PostLayout {
    pub fn for_board(board: &BoardSpec, post_height: f64, shoulder: Option<Shoulder>) -> Self {
        Self {
            spacing_x: board.spacing_x,
            spacing_y: board.spacing_y,
            post_diameter: board.post_diameter,
            post_height,
            shoulder,
        }
    }

    /// Post centers at (±Sx/2, ±Sy/2)
    pub fn centers(&self) -> [DVec2; 4] {
        let (hx, hy) = (self.spacing_x / 2.0, self.spacing_y / 2.0);
        [
            DVec2::new(-hx, -hy),
            DVec2::new(-hx, hy),
            DVec2::new(hx, -hy),
            DVec2::new(hx, hy),
        ]
    }

    pub fn build(&self) -> Result<SdfNode> {
        let post = self.single_post()?;
        union(
            self.centers()
                .map(|c| post.clone().translate(c.extend(0.0))),
        )
    }

    fn single_post(&self) -> Result<SdfNode> {
        let post = cylinder(self.post_height, self.post_diameter / 2.0, 0.0)?
            .translate_z(self.post_height / 2.0);
        match self.shoulder {
            Some(shoulder) => {
                let collar = cylinder(shoulder.height, shoulder.diameter / 2.0, 0.0)?
                    .translate(DVec3::new(0.0, 0.0, shoulder.height / 2.0));
                Ok(post.union(collar))
            }
            None => Ok(post),
        }
    }
}
