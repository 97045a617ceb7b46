use log::trace;

use super::{Expr, TensorRead};
use crate::dtype::DType;

impl Expr {
    /// Folds integer constants and applies algebraic identities bottom-up.
    ///
    /// Rewrites never change [`Expr::dtype`]; identities that only hold for
    /// integers are skipped on float operands. Division or remainder by a
    /// literal zero is left unfolded.
    pub fn simplify(self) -> Self {
        let before = trace_enabled().then(|| self.clone());
        let simplified = match self {
            Expr::Add(lhs, rhs) => {
                let lhs = lhs.simplify();
                let rhs = rhs.simplify();
                match (lhs, rhs) {
                    (e, Expr::IntImm(0)) => e,
                    (Expr::IntImm(0), e) if e.dtype() == DType::I32 => e,
                    (Expr::IntImm(l), Expr::IntImm(r)) => fold(l.checked_add(r), l, r, Expr::Add),
                    (l, r) => l + r,
                }
            }
            Expr::Sub(lhs, rhs) => {
                let lhs = lhs.simplify();
                let rhs = rhs.simplify();
                match (lhs, rhs) {
                    (e, Expr::IntImm(0)) => e,
                    (l, r) if l == r && l.dtype() == DType::I32 => Expr::IntImm(0),
                    (Expr::IntImm(l), Expr::IntImm(r)) => fold(l.checked_sub(r), l, r, Expr::Sub),
                    (Expr::Add(a, b), r) if *b == r && !a.dtype().is_float() => *a,
                    (Expr::Add(a, b), r) if *a == r && b.dtype() == a.dtype() && !a.dtype().is_float() => *b,
                    (Expr::IntImm(0), Expr::Sub(a, b)) if b.dtype() == DType::I32 => (*b - *a).simplify(),
                    (l, r) => l - r,
                }
            }
            Expr::Mul(lhs, rhs) => {
                let lhs = lhs.simplify();
                let rhs = rhs.simplify();
                match (lhs, rhs) {
                    (l, Expr::IntImm(0)) if l.dtype() == DType::I32 => Expr::IntImm(0),
                    (Expr::IntImm(0), _) => Expr::IntImm(0),
                    (e, Expr::IntImm(1)) => e,
                    (Expr::IntImm(1), e) if e.dtype() == DType::I32 => e,
                    (Expr::IntImm(l), Expr::IntImm(r)) => fold(l.checked_mul(r), l, r, Expr::Mul),
                    (l, r) => l * r,
                }
            }
            Expr::Div(lhs, rhs) => {
                let lhs = lhs.simplify();
                let rhs = rhs.simplify();
                match (lhs, rhs) {
                    (l, Expr::IntImm(0)) => l / Expr::IntImm(0),
                    (e, Expr::IntImm(1)) => e,
                    (Expr::IntImm(0), _) => Expr::IntImm(0),
                    (Expr::IntImm(l), Expr::IntImm(r)) => fold(l.checked_div(r), l, r, Expr::Div),
                    (l, r) if l == r && l.dtype() == DType::I32 => Expr::IntImm(1),
                    (l, r) => l / r,
                }
            }
            Expr::Rem(lhs, rhs) => {
                let lhs = lhs.simplify();
                let rhs = rhs.simplify();
                match (lhs, rhs) {
                    (l, Expr::IntImm(0)) => l % Expr::IntImm(0),
                    (l, Expr::IntImm(1)) if l.dtype() == DType::I32 => Expr::IntImm(0),
                    (Expr::IntImm(0), _) => Expr::IntImm(0),
                    (Expr::IntImm(l), Expr::IntImm(r)) => fold(l.checked_rem(r), l, r, Expr::Rem),
                    (l, r) if l == r && l.dtype() == DType::I32 => Expr::IntImm(0),
                    (l, r) => l % r,
                }
            }
            Expr::Shl(lhs, rhs) => {
                let lhs = lhs.simplify();
                let rhs = rhs.simplify();
                match (lhs, rhs) {
                    (e, Expr::IntImm(0)) => e,
                    (Expr::IntImm(l), Expr::IntImm(r)) => {
                        let shifted = u32::try_from(r).ok().and_then(|r| l.checked_shl(r));
                        fold(shifted, l, r, Expr::Shl)
                    }
                    (l, r) => l << r,
                }
            }
            Expr::Shr(lhs, rhs) => {
                let lhs = lhs.simplify();
                let rhs = rhs.simplify();
                match (lhs, rhs) {
                    (e, Expr::IntImm(0)) => e,
                    (Expr::IntImm(l), Expr::IntImm(r)) => {
                        let shifted = u32::try_from(r).ok().and_then(|r| l.checked_shr(r));
                        fold(shifted, l, r, Expr::Shr)
                    }
                    (l, r) => l >> r,
                }
            }
            Expr::And(lhs, rhs) => {
                let lhs = lhs.simplify();
                let rhs = rhs.simplify();
                match (lhs, rhs) {
                    (Expr::Bool(true), e) | (e, Expr::Bool(true)) => e,
                    (Expr::Bool(false), _) | (_, Expr::Bool(false)) => Expr::FALSE,
                    (l, r) => l.and(r),
                }
            }
            Expr::Or(lhs, rhs) => {
                let lhs = lhs.simplify();
                let rhs = rhs.simplify();
                match (lhs, rhs) {
                    (Expr::Bool(true), _) | (_, Expr::Bool(true)) => Expr::TRUE,
                    (Expr::Bool(false), e) | (e, Expr::Bool(false)) => e,
                    (l, r) => l.or(r),
                }
            }
            Expr::Not(e) => match e.simplify() {
                Expr::Bool(b) => Expr::Bool(!b),
                Expr::Not(inner) => *inner,
                e => !e,
            },
            Expr::Lt(lhs, rhs) => compare(*lhs, *rhs, |l, r| l < r, |l, r| l.lt(r)),
            Expr::Le(lhs, rhs) => compare(*lhs, *rhs, |l, r| l <= r, |l, r| l.le(r)),
            Expr::Gt(lhs, rhs) => compare(*lhs, *rhs, |l, r| l > r, |l, r| l.gt(r)),
            Expr::Ge(lhs, rhs) => compare(*lhs, *rhs, |l, r| l >= r, |l, r| l.ge(r)),
            Expr::Eq(lhs, rhs) => {
                let lhs = lhs.simplify();
                let rhs = rhs.simplify();
                match (lhs, rhs) {
                    (Expr::IntImm(l), Expr::IntImm(r)) => Expr::Bool(l == r),
                    (l, r) if l == r && !l.dtype().is_float() => Expr::TRUE,
                    (l, r) => l.equal(r),
                }
            }
            Expr::Ne(lhs, rhs) => {
                let lhs = lhs.simplify();
                let rhs = rhs.simplify();
                match (lhs, rhs) {
                    (Expr::IntImm(l), Expr::IntImm(r)) => Expr::Bool(l != r),
                    (l, r) if l == r && !l.dtype().is_float() => Expr::FALSE,
                    (l, r) => l.not_equal(r),
                }
            }
            Expr::Cast(dtype, e) => match e.simplify() {
                e if e.dtype() == dtype => e,
                e => e.cast(dtype),
            },
            Expr::Read(TensorRead { tensor, indices }) => Expr::Read(TensorRead {
                tensor,
                indices: indices.into_iter().map(Expr::simplify).collect(),
            }),
            e @ (Expr::IntImm(_) | Expr::FloatImm(_) | Expr::Bool(_) | Expr::Var(_)) => e,
        };
        if let Some(before) = before {
            if before != simplified {
                trace!("simplified {before} -> {simplified}");
            }
        }
        simplified
    }
}

fn trace_enabled() -> bool {
    log::log_enabled!(log::Level::Trace)
}

/// Keeps the original node when folding would overflow or divide by zero.
fn fold(
    folded: Option<i64>,
    l: i64,
    r: i64,
    rebuild: fn(Box<Expr>, Box<Expr>) -> Expr,
) -> Expr {
    match folded {
        Some(v) => Expr::IntImm(v),
        None => rebuild(Box::new(Expr::IntImm(l)), Box::new(Expr::IntImm(r))),
    }
}

fn compare(
    lhs: Expr,
    rhs: Expr,
    op: fn(i64, i64) -> bool,
    rebuild: fn(Expr, Expr) -> Expr,
) -> Expr {
    match (lhs.simplify(), rhs.simplify()) {
        (Expr::IntImm(l), Expr::IntImm(r)) => Expr::Bool(op(l, r)),
        (l, r) => rebuild(l, r),
    }
}

/// Returns `true` if both shapes have the same rank and every extent
/// simplifies to the same expression.
pub fn shapes_equal(lhs: &[Expr], rhs: &[Expr]) -> bool {
    lhs.len() == rhs.len()
        && lhs
            .iter()
            .zip(rhs)
            .all(|(l, r)| l == r || l.clone().simplify() == r.clone().simplify())
}
