//! Path instruction interpreter.

use crate::foundation::error::{ReelError, ReelResult};
use crate::render::surface::Surface;
use crate::scene::model::PathPointDef;

/// Start a fresh path on `surface` and emit `points` in order.
///
/// Every instruction is checked before anything is emitted, so an unsupported one leaves the
/// surface's current path empty rather than half-built.
pub fn trace_path<S: Surface + ?Sized>(surface: &mut S, points: &[PathPointDef]) -> ReelResult<()> {
    if let Some((i, PathPointDef::Unknown(kind))) = points
        .iter()
        .enumerate()
        .find(|(_, p)| matches!(p, PathPointDef::Unknown(_)))
    {
        return Err(ReelError::unsupported(format!(
            "path instruction \"{kind}\" at index {i}"
        )));
    }

    surface.begin_path();
    for point in points {
        match point {
            PathPointDef::MoveTo { p } => surface.move_to(p.to_point()),
            PathPointDef::LineTo { p } => surface.line_to(p.to_point()),
            PathPointDef::QuadraticCurveTo { control, p } => {
                surface.quad_to(control.to_point(), p.to_point());
            }
            PathPointDef::Unknown(_) => {}
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/path.rs"]
mod tests;
