/*!
Bit-vector normalization (spec §4.2) --- the most subtle algorithmic piece of the
core: turning a mixture of evaluable constants, concatenations, bit-extractions, and
polynomials into a canonical form over the low *w* bits, separating an evaluable
part from a variable part so bit-vector conflict analysis can reason about the
result arithmetically.

# The `bv_poly` embedding convention

A [TermKind::BvPoly] of width `W` represents `constant + sum(coeff_i * var_i) mod
2^W`. Where a monomial's `var_i` itself has a narrower bitwidth than `W`, its value
is implicitly **zero-extended** to `W` before the coefficient is applied; this is how
[analyse](Normalizer::analyse) expresses both "place this value at bit offset
`suffix`" (multiply by `2^suffix`) and "zero-extend this narrower slice" (embed it as
a var in a wider poly) without a dedicated zero-extension term kind.
*/

pub mod analysis;

use analysis::{AnalysisRecord, EvalContext, SharedAnalysis};

use crate::structures::bv_value::BvValue;
use crate::structures::coeff::Coeff;
use crate::structures::kind::{Monomial, TermKind};
use crate::structures::sort::Sort;
use crate::structures::term::TermId;
use crate::term_store::TermStore;
use crate::types::err::NormalizeError;

use crate::misc::log::targets;

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// Canonicalizes bit-vector terms modulo a target width, memoizing per (term,
/// width) pair.
#[derive(Default)]
pub struct Normalizer {
    norm_memo: HashMap<(u32, u32), TermId>,
    analysis_memo: HashMap<(u32, u32), SharedAnalysis>,
    in_progress: HashSet<(u32, u32)>,
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops all memoized results. Called whenever the owning [TermStore] is
    /// garbage-collected or reset (spec §9: "the cache is cleared when the term
    /// store is garbage-collected or reset").
    pub fn reset(&mut self) {
        self.norm_memo.clear();
        self.analysis_memo.clear();
        self.in_progress.clear();
    }

    /// Produces a canonical term of width `w` that evaluates identically to `u`'s
    /// low `w` bits under any model (spec §4.2).
    pub fn normalize(
        &mut self,
        store: &mut TermStore,
        eval_ctx: &dyn EvalContext,
        t: TermId,
        w: u32,
    ) -> Result<TermId, NormalizeError> {
        if w == 0 {
            return Err(NormalizeError::ZeroWidth);
        }
        if let Some(bw) = store.width_of(t) {
            if w > bw {
                return Err(NormalizeError::WidthExceedsTerm);
            }
        }

        let key = (t.raw(), w);
        if let Some(cached) = self.norm_memo.get(&key) {
            return Ok(*cached);
        }

        let result = self.normalize_uncached(store, eval_ctx, t, w)?;
        self.norm_memo.insert(key, result);
        log::trace!(target: targets::NORMALIZER, "normalize({t}, {w}) = {result}");
        Ok(result)
    }

    fn normalize_uncached(
        &mut self,
        store: &mut TermStore,
        eval_ctx: &dyn EvalContext,
        t: TermId,
        w: u32,
    ) -> Result<TermId, NormalizeError> {
        if t.is_negated() {
            let positive = self.normalize(store, eval_ctx, t.positive(), w)?;
            return Ok(positive.negate());
        }

        let kind = store.kind_of(t).clone();

        match kind {
            TermKind::BoolConstant(_) => Ok(t),

            TermKind::BvConstant(v) => {
                if v.width() == w {
                    Ok(t)
                } else {
                    intern_bv_const(store, v.truncate_to(w))
                }
            }

            TermKind::BvPoly {
                width,
                constant,
                monomials,
            } => {
                let new_constant = Coeff::from_bv_value(rebase_to(constant.to_bv_value(width), w));
                let mut new_monomials = Vec::with_capacity(monomials.len());
                for m in &monomials {
                    let rec = self.analyse(store, eval_ctx, m.var, w)?;
                    new_monomials.push(Monomial {
                        coeff: rebase_coeff(&m.coeff, width, w),
                        var: rec.norm,
                    });
                }
                build_poly(store, w, new_constant, new_monomials)
            }

            TermKind::BvArray { .. } => Ok(self.analyse(store, eval_ctx, t, w)?.norm),

            TermKind::BitSelect { base, index } => {
                let base_w = store.width_of(base).unwrap_or(index + 1);
                let new_base = self.normalize(store, eval_ctx, base, (index + 1).min(base_w))?;
                store
                    .intern(
                        TermKind::BitSelect {
                            base: new_base,
                            index,
                        },
                        Sort::Bool,
                    )
                    .map_err(|_| NormalizeError::WidthExceedsTerm)
            }

            TermKind::Eq { lhs, rhs } => {
                let new_lhs = self.normalize_child(store, eval_ctx, lhs)?;
                let new_rhs = self.normalize_child(store, eval_ctx, rhs)?;
                store
                    .intern(
                        TermKind::Eq {
                            lhs: new_lhs,
                            rhs: new_rhs,
                        },
                        Sort::Bool,
                    )
                    .map_err(|_| NormalizeError::WidthExceedsTerm)
            }

            TermKind::BvCompare { op, lhs, rhs } => {
                let new_lhs = self.normalize_child(store, eval_ctx, lhs)?;
                let new_rhs = self.normalize_child(store, eval_ctx, rhs)?;
                store
                    .intern(
                        TermKind::BvCompare {
                            op,
                            lhs: new_lhs,
                            rhs: new_rhs,
                        },
                        Sort::Bool,
                    )
                    .map_err(|_| NormalizeError::WidthExceedsTerm)
            }

            TermKind::BvArith { op, lhs, rhs } => {
                let new_lhs = self.normalize_child(store, eval_ctx, lhs)?;
                let new_rhs = self.normalize_child(store, eval_ctx, rhs)?;
                let sort = store.sort_of(t).clone();
                store
                    .intern(
                        TermKind::BvArith {
                            op,
                            lhs: new_lhs,
                            rhs: new_rhs,
                        },
                        sort,
                    )
                    .map_err(|_| NormalizeError::WidthExceedsTerm)
            }

            TermKind::Ite {
                cond,
                then_branch,
                else_branch,
            } => {
                let new_then = self.normalize_child(store, eval_ctx, then_branch)?;
                let new_else = self.normalize_child(store, eval_ctx, else_branch)?;
                let sort = store.sort_of(t).clone();
                store
                    .intern(
                        TermKind::Ite {
                            cond,
                            then_branch: new_then,
                            else_branch: new_else,
                        },
                        sort,
                    )
                    .map_err(|_| NormalizeError::WidthExceedsTerm)
            }

            TermKind::Or(args) => {
                let mut new_args = Vec::with_capacity(args.len());
                for a in &args {
                    new_args.push(self.normalize_child(store, eval_ctx, *a)?);
                }
                store
                    .intern(TermKind::Or(new_args), Sort::Bool)
                    .map_err(|_| NormalizeError::WidthExceedsTerm)
            }

            TermKind::Forall { bound, body } => {
                let new_body = self.normalize_child(store, eval_ctx, body)?;
                store
                    .intern(
                        TermKind::Forall {
                            bound,
                            body: new_body,
                        },
                        Sort::Bool,
                    )
                    .map_err(|_| NormalizeError::WidthExceedsTerm)
            }

            TermKind::Exists { bound, body } => {
                let new_body = self.normalize_child(store, eval_ctx, body)?;
                store
                    .intern(
                        TermKind::Exists {
                            bound,
                            body: new_body,
                        },
                        Sort::Bool,
                    )
                    .map_err(|_| NormalizeError::WidthExceedsTerm)
            }

            // Uninterpreted, Apply, Extract, and a stray Not (never allocated by
            // `intern`, but matched for exhaustiveness): no further decomposition
            // is possible, so fall back to a plain extraction of the low `w` bits.
            TermKind::Uninterpreted { .. }
            | TermKind::Apply { .. }
            | TermKind::Extract { .. }
            | TermKind::Not(_) => extract_term(store, t, 0, w),
        }
    }

    /// Normalizes a child term at its own bitwidth (BV sorts) or passes it through
    /// unchanged (non-BV sorts), per spec's "Recursively normalize each argument to
    /// its own bitwidth".
    fn normalize_child(
        &mut self,
        store: &mut TermStore,
        eval_ctx: &dyn EvalContext,
        child: TermId,
    ) -> Result<TermId, NormalizeError> {
        match store.width_of(child) {
            Some(bw) => self.normalize(store, eval_ctx, child, bw),
            None => Ok(child),
        }
    }

    /// The richer decomposition needed by conflict-explanation clients (spec
    /// §4.2): separates evaluable from variable content, detecting sign-extension
    /// and negated-bit patterns along the way.
    pub fn analyse(
        &mut self,
        store: &mut TermStore,
        eval_ctx: &dyn EvalContext,
        t: TermId,
        w: u32,
    ) -> Result<SharedAnalysis, NormalizeError> {
        let key = (t.raw(), w);
        if let Some(cached) = self.analysis_memo.get(&key) {
            return Ok(cached.clone());
        }
        if !self.in_progress.insert(key) {
            return Err(NormalizeError::ReentrantAnalysis(t, w));
        }

        let computed = self.compute_analysis(store, eval_ctx, t, w);
        self.in_progress.remove(&key);
        let record = computed?;

        let rc = Rc::new(record);
        self.analysis_memo.insert(key, rc.clone());
        Ok(rc)
    }

    fn compute_analysis(
        &mut self,
        store: &mut TermStore,
        eval_ctx: &dyn EvalContext,
        t: TermId,
        w: u32,
    ) -> Result<AnalysisRecord, NormalizeError> {
        let bits: Vec<TermId> = (0..w).map(|i| bit_of(store, t, i)).collect::<Result<_, _>>()?;

        let mut suffix = 0u32;
        let mut eval_val = BvValue::zero(w);
        while suffix < w {
            match bit_value(store, eval_ctx, bits[suffix as usize]) {
                Some(true) => {
                    eval_val = eval_val.wrapping_add(&BvValue::single_bit(w, suffix));
                    suffix += 1;
                }
                Some(false) => suffix += 1,
                None => break,
            }
        }

        if suffix == w {
            let eval_term = intern_bv_const(store, eval_val)?;
            let var_term = intern_bv_const(store, BvValue::zero(w))?;
            return Ok(AnalysisRecord {
                suffix: w,
                length: 0,
                start: 0,
                base: None,
                eval: eval_term,
                var: var_term,
                norm: eval_term,
                intros: false,
                nobueno: false,
            });
        }

        let pivot = bits[suffix as usize];
        let pivot_select = as_bit_select(store, pivot);

        let (base0, start, pol0, mut length, mut nobueno) = match pivot_select {
            Some((base, idx, neg)) => {
                let mut shortlength = 1u32;
                while suffix + shortlength < w {
                    let next = bits[(suffix + shortlength) as usize];
                    match as_bit_select(store, next) {
                        Some((b2, i2, n2)) if b2 == base && i2 == idx + shortlength && n2 == neg => {
                            shortlength += 1;
                        }
                        _ => break,
                    }
                }
                // Sign-extension tail: further bits repeating the top bit of the
                // run just found (spec: "a tail of repeated copies of the top bit").
                let mut total_length = shortlength;
                while suffix + total_length < w {
                    let next = bits[(suffix + total_length) as usize];
                    match as_bit_select(store, next) {
                        Some((b2, i2, n2))
                            if b2 == base && i2 == idx + shortlength - 1 && n2 == neg =>
                        {
                            total_length += 1;
                        }
                        _ => break,
                    }
                }
                (Some((base, shortlength)), idx, neg, total_length, false)
            }
            None => (None, 0, false, w - suffix, true),
        };

        if !nobueno {
            let trailing_ok = ((suffix + length)..w)
                .all(|k| bit_value(store, eval_ctx, bits[k as usize]).is_some());
            if !trailing_ok {
                length = w - suffix;
                nobueno = true;
            }
        }

        for k in (suffix + length)..w {
            if let Some(true) = bit_value(store, eval_ctx, bits[k as usize]) {
                eval_val = eval_val.wrapping_add(&BvValue::single_bit(w, k));
            }
        }
        let eval_term = intern_bv_const(store, eval_val)?;

        let (var_len_term, intros) = if nobueno {
            let slice = bits[suffix as usize..(suffix + length) as usize].to_vec();
            let term = store
                .intern(TermKind::BvArray { bits: slice }, Sort::BitVec(length))
                .map_err(|_| NormalizeError::WidthExceedsTerm)?;
            (term, false)
        } else {
            let (base, shortlength) = base0.unwrap();
            let signlen = length - shortlength;

            // Negated-polarity rewrite: ¬x == -(x+1) bit-for-bit, so a negated
            // base is replaced with a positive base representing that identity.
            let positive_base = if pol0 {
                negate_base(store, base)?
            } else {
                base
            };

            let raw_slice = extract_term(store, positive_base, start, shortlength)?;

            let var_len_term = if signlen == 0 {
                raw_slice
            } else {
                // sign_extend(x, length) == zero_extend(x + half, length) - zero_extend(half, length)
                let half_narrow = Coeff::power_of_two(shortlength, shortlength - 1);
                let biased_narrow = build_poly(
                    store,
                    shortlength,
                    half_narrow,
                    vec![Monomial {
                        coeff: Coeff::from_u64(shortlength, 1),
                        var: raw_slice,
                    }],
                )?;
                let half_wide = Coeff::power_of_two(length, shortlength - 1);
                build_poly(
                    store,
                    length,
                    half_wide.negate(length),
                    vec![Monomial {
                        coeff: Coeff::from_u64(length, 1),
                        var: biased_narrow,
                    }],
                )?
            };

            (var_len_term, pol0 || signlen > 0)
        };

        let var_term = build_poly(
            store,
            w,
            Coeff::zero(w),
            vec![Monomial {
                coeff: Coeff::power_of_two(w, suffix),
                var: var_len_term,
            }],
        )?;

        let norm_term = build_poly(
            store,
            w,
            Coeff::from_bv_value(eval_val_for_norm(store, eval_term)),
            vec![Monomial {
                coeff: Coeff::power_of_two(w, suffix),
                var: var_len_term,
            }],
        )?;

        Ok(AnalysisRecord {
            suffix,
            length,
            start,
            base: if nobueno { None } else { base0.map(|(b, _)| b) },
            eval: eval_term,
            var: var_term,
            norm: norm_term,
            intros,
            nobueno,
        })
    }
}

fn eval_val_for_norm(store: &TermStore, eval_term: TermId) -> BvValue {
    match store.kind_of(eval_term) {
        TermKind::BvConstant(v) => v.clone(),
        _ => unreachable!("eval_term is always interned as a BvConstant"),
    }
}

fn rebase_to(v: BvValue, new_width: u32) -> BvValue {
    if v.width() == new_width {
        v
    } else if v.width() < new_width {
        v.zero_extend(new_width)
    } else {
        v.truncate_to(new_width)
    }
}

fn rebase_coeff(c: &Coeff, old_width: u32, new_width: u32) -> Coeff {
    Coeff::from_bv_value(rebase_to(c.to_bv_value(old_width), new_width))
}

fn intern_bv_const(store: &mut TermStore, v: BvValue) -> Result<TermId, NormalizeError> {
    let width = v.width();
    store
        .intern(TermKind::BvConstant(v), Sort::BitVec(width))
        .map_err(|_| NormalizeError::WidthExceedsTerm)
}

fn negate_base(store: &mut TermStore, base: TermId) -> Result<TermId, NormalizeError> {
    let width = store.width_of(base).ok_or(NormalizeError::WidthExceedsTerm)?;
    build_poly(
        store,
        width,
        Coeff::from_u64(width, 1).negate(width),
        vec![Monomial {
            coeff: Coeff::from_u64(width, 1).negate(width),
            var: base,
        }],
    )
}

fn build_poly(
    store: &mut TermStore,
    width: u32,
    constant: Coeff,
    monomials: Vec<Monomial>,
) -> Result<TermId, NormalizeError> {
    let monomials: Vec<Monomial> = monomials.into_iter().filter(|m| !m.coeff.is_zero()).collect();
    if monomials.is_empty() {
        return intern_bv_const(store, constant.to_bv_value(width));
    }
    store
        .intern(
            TermKind::BvPoly {
                width,
                constant,
                monomials,
            },
            Sort::BitVec(width),
        )
        .map_err(|_| NormalizeError::WidthExceedsTerm)
}

/// Builds `extract(base, lo, len)`, collapsing to `base` itself when that would be
/// the identity extraction.
fn extract_term(
    store: &mut TermStore,
    base: TermId,
    lo: u32,
    len: u32,
) -> Result<TermId, NormalizeError> {
    if lo == 0 && store.width_of(base) == Some(len) {
        return Ok(base);
    }
    store
        .intern(TermKind::Extract { base, low: lo, len }, Sort::BitVec(len))
        .map_err(|_| NormalizeError::WidthExceedsTerm)
}

/// The term representing bit `i` of `t` (a boolean-sorted term).
fn bit_of(store: &mut TermStore, t: TermId, i: u32) -> Result<TermId, NormalizeError> {
    match store.kind_of(t) {
        TermKind::BvConstant(v) => store
            .intern(TermKind::BoolConstant(v.bit(i)), Sort::Bool)
            .map_err(|_| NormalizeError::WidthExceedsTerm),
        TermKind::BvArray { bits } => bits
            .get(i as usize)
            .copied()
            .ok_or(NormalizeError::WidthExceedsTerm),
        _ => store
            .intern(TermKind::BitSelect { base: t, index: i }, Sort::Bool)
            .map_err(|_| NormalizeError::WidthExceedsTerm),
    }
}

/// If `bit` is (a possibly negated) `bit_select(base, index)`, the `(base, index,
/// negated)` triple.
fn as_bit_select(store: &TermStore, bit: TermId) -> Option<(TermId, u32, bool)> {
    match store.kind_of(bit.positive()) {
        TermKind::BitSelect { base, index } => Some((*base, *index, bit.is_negated())),
        _ => None,
    }
}

/// The value of `bit` under the current trail, if determined.
fn bit_value(store: &TermStore, eval_ctx: &dyn EvalContext, bit: TermId) -> Option<bool> {
    let negated = bit.is_negated();
    let raw = match store.kind_of(bit.positive()) {
        TermKind::BoolConstant(b) => Some(*b),
        TermKind::BitSelect { base, index } => eval_ctx.bit_value(*base, *index),
        _ => None,
    }?;
    Some(raw ^ negated)
}
