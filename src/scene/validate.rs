use crate::assets::store::normalize_rel_path;
use crate::foundation::core::FrameRate;
use crate::foundation::error::ReelError;
use crate::render::style::{resolve_fill, resolve_stroke};
use crate::scene::model::{FrameDef, InstanceDef, PathDef, PathPointDef, SceneDef, ShapeDef};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SchemaPathElem {
    Field(&'static str),
    Index(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SchemaErrorKind {
    /// Structural contract violation.
    Malformed,
    /// Kind outside the supported closed set.
    Unsupported,
}

#[derive(Debug, Clone)]
pub(crate) struct SchemaError {
    pub(crate) kind: SchemaErrorKind,
    pub(crate) path: Vec<SchemaPathElem>,
    pub(crate) message: String,
}

impl SchemaError {
    fn at(path: &[SchemaPathElem], message: impl Into<String>) -> Self {
        Self {
            kind: SchemaErrorKind::Malformed,
            path: path.to_vec(),
            message: message.into(),
        }
    }

    fn unsupported_at(path: &[SchemaPathElem], message: impl Into<String>) -> Self {
        Self {
            kind: SchemaErrorKind::Unsupported,
            path: path.to_vec(),
            message: message.into(),
        }
    }

    fn from_style_error(path: &[SchemaPathElem], err: &ReelError) -> Self {
        if err.is_unsupported() {
            Self::unsupported_at(path, err.detail())
        } else {
            Self::at(path, err.detail())
        }
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            return write!(f, "{}", self.message);
        }
        write!(f, "{}: {}", format_path(&self.path), self.message)
    }
}

fn format_path(path: &[SchemaPathElem]) -> String {
    let mut s = String::from("$");
    for p in path {
        match *p {
            SchemaPathElem::Field(name) => {
                s.push('.');
                s.push_str(name);
            }
            SchemaPathElem::Index(i) => {
                s.push('[');
                s.push_str(&i.to_string());
                s.push(']');
            }
        }
    }
    s
}

#[derive(Debug, Clone)]
pub(crate) struct SchemaErrors {
    pub(crate) errors: Vec<SchemaError>,
}

impl fmt::Display for SchemaErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaErrors {}

impl From<SchemaErrors> for ReelError {
    /// Unsupported kinds win over structural problems: the first one is reported.
    fn from(errs: SchemaErrors) -> Self {
        if let Some(e) = errs
            .errors
            .iter()
            .find(|e| e.kind == SchemaErrorKind::Unsupported)
        {
            return ReelError::unsupported(e.to_string());
        }
        ReelError::scene(errs.to_string())
    }
}

pub(crate) fn validate_scene(def: &SceneDef) -> Result<(), SchemaErrors> {
    let mut errors = Vec::new();

    if def.width == 0 || def.height == 0 {
        errors.push(SchemaError::at(
            &[SchemaPathElem::Field("width")],
            "width and height must be > 0",
        ));
    }
    if let Err(e) = FrameRate::new(def.frame_rate) {
        errors.push(SchemaError::at(
            &[SchemaPathElem::Field("frameRate")],
            e.detail(),
        ));
    }
    if def.frames.is_empty() {
        errors.push(SchemaError::at(
            &[SchemaPathElem::Field("frames")],
            "scene must contain at least one frame",
        ));
    }

    for (i, inst) in def.instances.iter().enumerate() {
        let path = [SchemaPathElem::Field("instances"), SchemaPathElem::Index(i)];
        validate_instance(inst, &path, &mut errors);
    }

    for (fi, frame) in def.frames.iter().enumerate() {
        let path = [SchemaPathElem::Field("frames"), SchemaPathElem::Index(fi)];
        validate_frame(frame, def.instances.len(), &path, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(SchemaErrors { errors })
    }
}

fn validate_instance(inst: &InstanceDef, path: &[SchemaPathElem], errors: &mut Vec<SchemaError>) {
    match inst {
        InstanceDef::Bitmap(b) => {
            if let Err(e) = normalize_rel_path(&b.path) {
                let mut p = path.to_vec();
                p.push(SchemaPathElem::Field("path"));
                errors.push(SchemaError::at(&p, e.detail()));
            }
        }
        InstanceDef::Shape(shape) => validate_shape(shape, path, errors),
        InstanceDef::Unknown(tag) => {
            let mut p = path.to_vec();
            p.push(SchemaPathElem::Field("type"));
            errors.push(SchemaError::unsupported_at(
                &p,
                format!("instance type \"{tag}\" (expected \"bitmap\" or \"shape\")"),
            ));
        }
    }
}

fn validate_shape(shape: &ShapeDef, path: &[SchemaPathElem], errors: &mut Vec<SchemaError>) {
    if shape.point_count() == 0 {
        errors.push(SchemaError::at(
            path,
            "shape must contain at least one path point",
        ));
    }

    for (i, style) in shape.fill_styles.iter().enumerate() {
        if let Err(e) = resolve_fill(style) {
            let mut p = path.to_vec();
            p.extend([SchemaPathElem::Field("fillStyles"), SchemaPathElem::Index(i)]);
            errors.push(SchemaError::from_style_error(&p, &e));
        }
    }
    for (i, style) in shape.stroke_styles.iter().enumerate() {
        if let Err(e) = resolve_stroke(style) {
            let mut p = path.to_vec();
            p.extend([SchemaPathElem::Field("strokeStyles"), SchemaPathElem::Index(i)]);
            errors.push(SchemaError::from_style_error(&p, &e));
        }
    }

    validate_paths(
        &shape.fill_paths,
        "fillPaths",
        shape.fill_styles.len(),
        path,
        errors,
    );
    validate_paths(
        &shape.stroke_paths,
        "strokePaths",
        shape.stroke_styles.len(),
        path,
        errors,
    );
}

fn validate_paths(
    paths: &[PathDef],
    field: &'static str,
    style_count: usize,
    path: &[SchemaPathElem],
    errors: &mut Vec<SchemaError>,
) {
    for (pi, p) in paths.iter().enumerate() {
        let mut here = path.to_vec();
        here.extend([SchemaPathElem::Field(field), SchemaPathElem::Index(pi)]);

        if p.index >= style_count {
            let mut at = here.clone();
            at.push(SchemaPathElem::Field("index"));
            errors.push(SchemaError::at(
                &at,
                format!("style index {} out of range ({style_count} styles)", p.index),
            ));
        }

        for (ii, point) in p.points.iter().enumerate() {
            if let PathPointDef::Unknown(tag) = point {
                let mut at = here.clone();
                at.extend([SchemaPathElem::Field("points"), SchemaPathElem::Index(ii)]);
                errors.push(SchemaError::unsupported_at(
                    &at,
                    format!("path instruction \"{tag}\""),
                ));
            }
        }
    }
}

fn validate_frame(
    frame: &FrameDef,
    instance_count: usize,
    path: &[SchemaPathElem],
    errors: &mut Vec<SchemaError>,
) {
    for (pi, placement) in frame.instances.iter().enumerate() {
        let mut here = path.to_vec();
        here.extend([SchemaPathElem::Field("instances"), SchemaPathElem::Index(pi)]);

        if placement.instance_index >= instance_count {
            let mut at = here.clone();
            at.push(SchemaPathElem::Field("instanceIndex"));
            errors.push(SchemaError::at(
                &at,
                format!(
                    "instanceIndex {} out of range ({instance_count} instances)",
                    placement.instance_index
                ),
            ));
        }

        if !placement.masked {
            continue;
        }

        let mut at = here.clone();
        at.push(SchemaPathElem::Field("masks"));
        if placement.masks.is_empty() {
            errors.push(SchemaError::at(
                &at,
                "masked placement must reference at least one mask",
            ));
        }
        for &mi in &placement.masks {
            match frame.instances.get(mi) {
                None => errors.push(SchemaError::at(
                    &at,
                    format!(
                        "mask index {mi} out of range ({} placements)",
                        frame.instances.len()
                    ),
                )),
                Some(m) if !m.mask => errors.push(SchemaError::at(
                    &at,
                    format!("mask index {mi} points at a placement without mask=true"),
                )),
                Some(_) => {}
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/validate.rs"]
mod tests;
