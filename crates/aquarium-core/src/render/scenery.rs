//! Decor blits for one side of the creature layer.

use crate::components::{Decor, DecorLayer};
use crate::surface::DrawSurface;

/// Draws the decor pieces assigned to `layer`, in slice order.
pub fn draw_decor<S: DrawSurface + ?Sized>(surface: &mut S, decor: &[Decor], layer: DecorLayer) {
    for piece in decor.iter().filter(|d| d.layer == layer) {
        surface.draw_image(piece.image, piece.dest());
    }
}
