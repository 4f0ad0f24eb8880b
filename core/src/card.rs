use serde::{Deserialize, Serialize};

use crate::*;

/// Which side of a card the renderer should draw.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardFace {
    Front,
    Back,
}

impl CardFace {
    pub const fn is_front(self) -> bool {
        matches!(self, Self::Front)
    }
}

impl Default for CardFace {
    fn default() -> Self {
        Self::Back
    }
}

/// One grid cell: where it is drawn, what it hides, and whether it is face-up.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Card<I> {
    rect: Rect,
    identity: Identity,
    image: I,
    flipped: bool,
    matched: bool,
}

impl<I> Card<I> {
    pub fn new(rect: Rect, identity: Identity, image: I) -> Self {
        Self {
            rect,
            identity,
            image,
            flipped: false,
            matched: false,
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn identity(&self) -> Identity {
        self.identity
    }

    /// Face image, regardless of which side is currently showing.
    pub fn image(&self) -> &I {
        &self.image
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn is_matched(&self) -> bool {
        self.matched
    }

    /// Turn face-up, no-op on matched cards
    pub fn reveal(&mut self) {
        if !self.matched {
            self.flipped = true;
        }
    }

    /// Turn face-down, matched cards stay up
    pub fn conceal(&mut self) {
        if !self.matched {
            self.flipped = false;
        }
    }

    pub fn render_face(&self) -> CardFace {
        if self.flipped || self.matched {
            CardFace::Front
        } else {
            CardFace::Back
        }
    }

    pub(crate) fn mark_matched(&mut self) {
        self.matched = true;
        self.flipped = true;
    }
}
