//! Object reconstruction from inferred pairs
//!
//! A constructor whose signature equals the ordered inferred types is
//! preferred and receives the values in parse order. Otherwise the default
//! constructor runs and each pair is assigned to the field, then the
//! property, of the same name when the types agree. Pairs that cannot be
//! assigned are counted in the [`BuildReport`], never treated as errors.

use crate::error::*;
use crate::infer::{infer_with, InferenceOrder};
use crate::reflect::{AssignOutcome, AssignPolicy, MemberDescriptor, Reflect};
use crate::types::*;
use tracing::debug;

/// Which construction path produced the object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildPath {
    Constructor,
    Default,
}

/// Assignment diagnostics for one reconstruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub path: BuildPath,
    pub assigned: usize,
    pub coerced: usize,
    /// Name matched but the inferred type did not
    pub skipped_mismatch: usize,
    /// Name matched a member without a setter
    pub skipped_read_only: usize,
    /// No member of that name
    pub skipped_unknown: usize,
}

impl BuildReport {
    fn new(path: BuildPath) -> Self {
        Self {
            path,
            assigned: 0,
            coerced: 0,
            skipped_mismatch: 0,
            skipped_read_only: 0,
            skipped_unknown: 0,
        }
    }

    pub fn skipped(&self) -> usize {
        self.skipped_mismatch + self.skipped_read_only + self.skipped_unknown
    }
}

/// A reconstructed object with its diagnostics
#[derive(Debug)]
pub struct Built<T> {
    pub value: T,
    pub report: BuildReport,
}

impl ConstructionPlan {
    /// Infer every pair's value in parse order
    pub fn from_pairs(pairs: &[RawPair], order: &InferenceOrder) -> Self {
        let mut plan = ConstructionPlan::default();
        for pair in pairs {
            let inferred = infer_with(&pair.value, order);
            plan.signature.push(inferred.scalar_type());
            plan.names.push(pair.key.clone());
            plan.values.push(inferred);
        }
        plan
    }
}

/// Reconstruct a `T` from a construction plan
pub fn build_object<T: Reflect>(plan: &ConstructionPlan, policy: AssignPolicy) -> Result<Built<T>> {
    let desc = T::describe();

    if let Some(ctor) = desc.find_constructor(&plan.signature) {
        debug!(
            type_name = desc.type_name,
            signature = %signature_string(&plan.signature),
            "constructing via matching constructor"
        );
        let value = ctor.invoke(&plan.scalars()).ok_or_else(|| FlatError::ConstructorFailed {
            type_name: desc.type_name.to_string(),
        })?;
        let mut report = BuildReport::new(BuildPath::Constructor);
        report.assigned = plan.len();
        return Ok(Built { value, report });
    }

    let Some(default_ctor) = desc.default_ctor() else {
        return Err(FlatError::ConstructorNotFound {
            type_name: desc.type_name.to_string(),
            signature: signature_string(&plan.signature),
        });
    };

    let mut value = default_ctor();
    let mut report = BuildReport::new(BuildPath::Default);

    for (name, inferred) in plan.pairs() {
        let candidates = [desc.field(name), desc.property(name)];
        if candidates.iter().all(Option::is_none) {
            debug!(member = name, "no member with this name, skipping");
            report.skipped_unknown += 1;
            continue;
        }
        for member in candidates.into_iter().flatten() {
            assign_member(member, &mut value, inferred, policy, &mut report);
        }
    }

    debug!(
        type_name = desc.type_name,
        assigned = report.assigned,
        coerced = report.coerced,
        skipped = report.skipped(),
        "constructed via default constructor"
    );
    Ok(Built { value, report })
}

fn assign_member<T>(
    member: &MemberDescriptor<T>,
    owner: &mut T,
    inferred: &InferredValue,
    policy: AssignPolicy,
    report: &mut BuildReport,
) {
    match member.write(owner, inferred, policy) {
        Some(AssignOutcome::Assigned) => report.assigned += 1,
        Some(AssignOutcome::Coerced) => report.coerced += 1,
        Some(AssignOutcome::Mismatch) => {
            debug!(
                member = member.name,
                declared = %member.declared,
                inferred = %inferred.scalar_type(),
                "type mismatch, skipping"
            );
            report.skipped_mismatch += 1;
        }
        None => {
            debug!(member = member.name, "member is read-only, skipping");
            report.skipped_read_only += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::TypeDescriptor;
    use crate::{constructor, field, property};

    #[derive(Debug, Default, PartialEq)]
    struct Pair {
        left: i32,
        right: i32,
        made_by_ctor: bool,
    }

    impl Pair {
        fn new(left: i32, right: i32) -> Self {
            Self {
                left,
                right,
                made_by_ctor: true,
            }
        }

        fn sum(&self) -> i32 {
            self.left + self.right
        }
    }

    impl Reflect for Pair {
        fn describe() -> TypeDescriptor<Self> {
            TypeDescriptor::new("Pair")
                .member(field!(Pair, left: i32))
                .member(field!(Pair, right: i32))
                .member(property!(Pair, sum: i32, get = Pair::sum))
                .constructor(constructor!(Pair => Pair::new, [i32, i32]))
                .default_constructor(Pair::default)
        }
    }

    #[derive(Debug)]
    struct NoDefault {
        v: i32,
    }

    impl Reflect for NoDefault {
        fn describe() -> TypeDescriptor<Self> {
            TypeDescriptor::new("NoDefault")
                .member(field!(NoDefault, v: i32))
                .constructor(constructor!(NoDefault => NoDefault::from_v, [i32]))
        }
    }

    impl NoDefault {
        fn from_v(v: i32) -> Self {
            Self { v }
        }
    }

    fn plan(pairs: &[(&str, &str)]) -> ConstructionPlan {
        let raw: Vec<_> = pairs.iter().map(|(k, v)| RawPair::new(*k, *v)).collect();
        ConstructionPlan::from_pairs(&raw, &InferenceOrder::default())
    }

    #[test]
    fn test_plan_inference() {
        let p = plan(&[("a", "\"1\""), ("b", "\"x\""), ("c", "\"2.5\"")]);
        assert_eq!(p.signature, vec![ScalarType::Int, ScalarType::Char, ScalarType::Float]);
        assert_eq!(p.names, vec!["a", "b", "c"]);
        assert_eq!(p.values[1].raw, "x");
    }

    #[test]
    fn test_constructor_preferred_over_default() {
        let built = build_object::<Pair>(&plan(&[("left", "3"), ("right", "4")]), AssignPolicy::Exact).unwrap();
        assert_eq!(built.report.path, BuildPath::Constructor);
        assert_eq!(built.value, Pair::new(3, 4));
    }

    #[test]
    fn test_constructor_args_follow_parse_order() {
        let built = build_object::<Pair>(&plan(&[("right", "4"), ("left", "3")]), AssignPolicy::Exact).unwrap();
        assert_eq!(built.value.left, 4);
        assert_eq!(built.value.right, 3);
    }

    #[test]
    fn test_default_path_assigns_and_counts() {
        let p = plan(&[("left", "5"), ("right", "2.5"), ("sum", "9"), ("ghost", "1")]);
        let built = build_object::<Pair>(&p, AssignPolicy::Exact).unwrap();
        let report = &built.report;
        assert_eq!(report.path, BuildPath::Default);
        assert!(!built.value.made_by_ctor);
        assert_eq!(built.value.left, 5);
        assert_eq!(built.value.right, 0);
        assert_eq!(report.assigned, 1);
        assert_eq!(report.skipped_mismatch, 1);
        assert_eq!(report.skipped_read_only, 1);
        assert_eq!(report.skipped_unknown, 1);
        assert_eq!(report.skipped(), 3);
    }

    #[test]
    fn test_reinfer_policy_keeps_lossy_decimal_out_of_int() {
        let p = plan(&[("left", "5"), ("right", "7.0"), ("extra", "1")]);
        let built = build_object::<Pair>(&p, AssignPolicy::Reinfer).unwrap();
        assert_eq!(built.report.coerced, 0);
        assert_eq!(built.report.skipped_mismatch, 1);
        assert_eq!(built.value.right, 0);
    }

    #[test]
    fn test_duplicate_keys_last_wins() {
        let p = plan(&[("left", "1"), ("left", "2"), ("left", "3")]);
        let built = build_object::<Pair>(&p, AssignPolicy::Exact).unwrap();
        assert_eq!(built.value.left, 3);
        assert_eq!(built.report.assigned, 3);
    }

    #[test]
    fn test_constructor_not_found() {
        let err = build_object::<NoDefault>(&plan(&[("v", "1"), ("w", "2")]), AssignPolicy::Exact).unwrap_err();
        match err {
            FlatError::ConstructorNotFound { type_name, signature } => {
                assert_eq!(type_name, "NoDefault");
                assert_eq!(signature, "int, int");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_single_arg_constructor() {
        let built = build_object::<NoDefault>(&plan(&[("v", "8")]), AssignPolicy::Exact).unwrap();
        assert_eq!(built.value.v, 8);
    }
}
