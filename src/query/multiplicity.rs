//! Multiplicity bounds and their rollup through the banded graph.
//!
//! ```text
//! engines [0..8] ──▶ LiquidStage ──▶ Stage ──▶ stages [1..5] ──▶ Rocket
//!                 membership^-1   superclass   typing^-1    membership^-1
//!
//! rolled-up engines = 0..8 × 1..5 = 0..40
//! ```
//!
//! A feature's rollup is the product of the declared bounds of every
//! part/port usage on the banded path from the feature to the root it
//! reaches. A type's rollup is the sum of the rollups of the features it
//! types.

use super::typing::{features_in, types_in};
use super::{QueryError, Resolution};
use crate::base::{ElementId, metatypes};
use crate::graph::{LabeledPropertyGraph, Projection, names};
use crate::model::{ElementRef, Model, ModelError};
use std::ops::{Add, Mul};
use tracing::{debug, trace, warn};

/// Upper limit on the banded paths examined per feature.
const PATH_LIMIT: usize = 256;

/// One end of a multiplicity range.
///
/// `Unbounded` (`*`) sorts above every finite bound. Arithmetic saturates
/// to `Unbounded`, except that zero times anything is zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Bound {
    Finite(u64),
    Unbounded,
}

impl Bound {
    pub const ZERO: Bound = Bound::Finite(0);
    pub const ONE: Bound = Bound::Finite(1);

    pub fn as_finite(self) -> Option<u64> {
        match self {
            Bound::Finite(n) => Some(n),
            Bound::Unbounded => None,
        }
    }
}

impl From<u64> for Bound {
    fn from(n: u64) -> Self {
        Bound::Finite(n)
    }
}

impl Mul for Bound {
    type Output = Bound;

    fn mul(self, rhs: Bound) -> Bound {
        match (self, rhs) {
            (Bound::Finite(0), _) | (_, Bound::Finite(0)) => Bound::ZERO,
            (Bound::Finite(a), Bound::Finite(b)) => a.checked_mul(b).map_or(Bound::Unbounded, Bound::Finite),
            _ => Bound::Unbounded,
        }
    }
}

impl Add for Bound {
    type Output = Bound;

    fn add(self, rhs: Bound) -> Bound {
        match (self, rhs) {
            (Bound::Finite(a), Bound::Finite(b)) => a.checked_add(b).map_or(Bound::Unbounded, Bound::Finite),
            _ => Bound::Unbounded,
        }
    }
}

impl std::fmt::Display for Bound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Bound::Finite(n) => write!(f, "{n}"),
            Bound::Unbounded => f.write_str("*"),
        }
    }
}

/// Which end of a range to read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoundKind {
    Lower,
    Upper,
}

/// A lower/upper bound pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Multiplicity {
    pub lower: Bound,
    pub upper: Bound,
}

impl Multiplicity {
    /// `1..1`, the multiplicity of a feature that declares none.
    pub const ONE: Multiplicity = Multiplicity {
        lower: Bound::ONE,
        upper: Bound::ONE,
    };

    pub const ZERO: Multiplicity = Multiplicity {
        lower: Bound::ZERO,
        upper: Bound::ZERO,
    };

    pub fn new(lower: impl Into<Bound>, upper: impl Into<Bound>) -> Self {
        Self {
            lower: lower.into(),
            upper: upper.into(),
        }
    }

    pub fn bound(&self, kind: BoundKind) -> Bound {
        match kind {
            BoundKind::Lower => self.lower,
            BoundKind::Upper => self.upper,
        }
    }
}

impl Mul for Multiplicity {
    type Output = Multiplicity;

    fn mul(self, rhs: Multiplicity) -> Multiplicity {
        Multiplicity {
            lower: self.lower * rhs.lower,
            upper: self.upper * rhs.upper,
        }
    }
}

impl Add for Multiplicity {
    type Output = Multiplicity;

    fn add(self, rhs: Multiplicity) -> Multiplicity {
        Multiplicity {
            lower: self.lower + rhs.lower,
            upper: self.upper + rhs.upper,
        }
    }
}

impl std::fmt::Display for Multiplicity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.lower == self.upper {
            write!(f, "[{}]", self.upper)
        } else {
            write!(f, "[{}..{}]", self.lower, self.upper)
        }
    }
}

// ============================================================================
// DECLARED MULTIPLICITY
// ============================================================================

/// The multiplicity a feature declares.
///
/// Follows `multiplicity` to the range element and reads its literal
/// bounds. A range with only an upper bound (`[5]`) is exact. No declared
/// multiplicity is `1..1`.
pub fn feature_multiplicity(model: &Model, feature: &ElementId) -> Result<Multiplicity, ModelError> {
    let element = model.get_element(feature)?;
    let Some(range) = element.reference("multiplicity") else {
        if element.raw("multiplicity")?.is_some() {
            debug!("Multiplicity of {feature} does not resolve, using 1..1");
        }
        return Ok(Multiplicity::ONE);
    };

    let mut lower = range.reference("lowerBound");
    let mut upper = range.reference("upperBound");
    if lower.is_none() && upper.is_none() {
        let bounds = range.attribute("bound")?.into_elements();
        match bounds.as_slice() {
            [only] => upper = Some(*only),
            [first, second, ..] => {
                lower = Some(*first);
                upper = Some(*second);
            }
            [] => {}
        }
    }

    let lower = lower.map(literal_bound).transpose()?;
    let upper = upper.map(literal_bound).transpose()?;
    Ok(match (lower, upper) {
        (Some(lower), Some(upper)) => Multiplicity { lower, upper },
        (None, Some(exact)) | (Some(exact), None) => Multiplicity {
            lower: exact,
            upper: exact,
        },
        (None, None) => Multiplicity::ONE,
    })
}

fn literal_bound(bound: ElementRef<'_>) -> Result<Bound, ModelError> {
    match bound.metatype().map(|m| m.as_str()) {
        Some(metatypes::LITERAL_INFINITY) => Ok(Bound::Unbounded),
        Some(metatypes::LITERAL_INTEGER) => bound
            .raw("value")?
            .and_then(|value| value.as_u64())
            .map(Bound::Finite)
            .ok_or_else(|| {
                ModelError::InvalidRecord(format!(
                    "{} has no non-negative integer value",
                    bound.id()
                ))
            }),
        other => Err(ModelError::Unsupported(format!(
            "bound {} of type {} is not a literal",
            bound.id(),
            other.unwrap_or("unknown")
        ))),
    }
}

// ============================================================================
// ROLLUP
// ============================================================================

/// Projections shared by the rollup of one or many features.
struct Rollup<'g, 'm> {
    lpg: &'g LabeledPropertyGraph<'m>,
    banded: Projection,
    typing: Projection,
}

impl<'g, 'm> Rollup<'g, 'm> {
    fn new(lpg: &'g LabeledPropertyGraph<'m>) -> Result<Self, QueryError> {
        Ok(Self {
            lpg,
            banded: lpg.get_projection(names::EXPANDED_BANDED)?,
            typing: lpg.get_projection(names::PART_TYPING)?,
        })
    }

    fn feature(&self, feature: &ElementId) -> Result<Resolution<Multiplicity>, QueryError> {
        let own = feature_multiplicity(self.lpg.model(), feature)?;
        let types = types_in(&self.typing, feature);
        if types.len() > 1 {
            debug!("{feature} has {} types, rollup is ambiguous", types.len());
            return Ok(Resolution::Ambiguous(types));
        }
        if !self.banded.contains(feature) {
            return Ok(Resolution::Unique(own));
        }

        let roots: Vec<&ElementId> = self
            .banded
            .reachable(feature)
            .into_iter()
            .filter(|id| self.banded.out_degree(id) == 0)
            .collect();
        match roots.as_slice() {
            [] => Ok(Resolution::Unique(own)),
            [root] => self.along_paths(feature, root),
            _ => {
                warn!("{feature} rolls up into {} roots", roots.len());
                Ok(Resolution::Ambiguous(roots.into_iter().cloned().collect()))
            }
        }
    }

    /// Product along every banded path to `root`; ambiguous when paths
    /// disagree.
    fn along_paths(
        &self,
        feature: &ElementId,
        root: &ElementId,
    ) -> Result<Resolution<Multiplicity>, QueryError> {
        let paths = self.banded.all_simple_paths(feature, root, PATH_LIMIT);
        let mut result: Option<Multiplicity> = None;
        let mut first_hops: Vec<ElementId> = Vec::new();
        let mut disagree = false;
        for path in &paths {
            let product = self.path_product(path)?;
            trace!("[ROLLUP] {feature} via {} hops: {product}", path.len() - 1);
            if let Some(hop) = path.get(1).filter(|hop| !first_hops.contains(hop)) {
                first_hops.push(hop.clone());
            }
            match result {
                None => result = Some(product),
                Some(previous) if previous != product => disagree = true,
                Some(_) => {}
            }
        }
        if disagree {
            return Ok(Resolution::Ambiguous(first_hops));
        }
        match result {
            Some(product) => Ok(Resolution::Unique(product)),
            None => Ok(Resolution::Unique(feature_multiplicity(self.lpg.model(), feature)?)),
        }
    }

    fn path_product(&self, path: &[ElementId]) -> Result<Multiplicity, QueryError> {
        let model = self.lpg.model();
        path.iter()
            .filter(|id| is_usage(self.lpg.metatype(id)))
            .try_fold(Multiplicity::ONE, |acc, id| -> Result<_, QueryError> {
                Ok(acc * feature_multiplicity(model, id)?)
            })
    }

    fn ty(&self, ty: &ElementId) -> Result<Resolution<Multiplicity>, QueryError> {
        let mut total = Multiplicity::ZERO;
        let mut ambiguous = Vec::new();
        for feature in features_in(&self.typing, ty) {
            match self.feature(&feature)? {
                Resolution::Unique(rolled) => total = total + rolled,
                Resolution::Ambiguous(_) => ambiguous.push(feature),
                Resolution::Missing => {}
            }
        }
        if ambiguous.is_empty() {
            Ok(Resolution::Unique(total))
        } else {
            Ok(Resolution::Ambiguous(ambiguous))
        }
    }
}

fn is_usage(metatype: Option<&str>) -> bool {
    matches!(
        metatype,
        Some(metatypes::PART_USAGE) | Some(metatypes::PORT_USAGE)
    )
}

/// Rolled-up lower and upper bounds of a feature.
pub fn roll_up_multiplicity(
    lpg: &LabeledPropertyGraph<'_>,
    feature: &ElementId,
) -> Result<Resolution<Multiplicity>, QueryError> {
    Rollup::new(lpg)?.feature(feature)
}

pub fn roll_up_lower_multiplicity(
    lpg: &LabeledPropertyGraph<'_>,
    feature: &ElementId,
) -> Result<Resolution<Bound>, QueryError> {
    Ok(roll_up_multiplicity(lpg, feature)?.map(|m| m.lower))
}

pub fn roll_up_upper_multiplicity(
    lpg: &LabeledPropertyGraph<'_>,
    feature: &ElementId,
) -> Result<Resolution<Bound>, QueryError> {
    Ok(roll_up_multiplicity(lpg, feature)?.map(|m| m.upper))
}

/// Sum of the rolled-up bounds of every feature typed by `ty`; zero when
/// nothing is typed by it.
pub fn roll_up_multiplicity_for_type(
    lpg: &LabeledPropertyGraph<'_>,
    ty: &ElementId,
    kind: BoundKind,
) -> Result<Resolution<Bound>, QueryError> {
    Ok(Rollup::new(lpg)?.ty(ty)?.map(|m| m.bound(kind)))
}

/// Simple paths between two nodes of the `Expanded Banded` projection.
pub fn banded_paths(
    lpg: &LabeledPropertyGraph<'_>,
    from: &ElementId,
    to: &ElementId,
) -> Result<Vec<Vec<ElementId>>, QueryError> {
    let banded = lpg.get_projection(names::EXPANDED_BANDED)?;
    banded.require(from)?;
    banded.require(to)?;
    Ok(banded.all_simple_paths(from, to, PATH_LIMIT))
}
