//! Discovery & Validation
//!
//! Turns a class's method table into a validated [`ClassLayout`]. Only the
//! declarations are inspected; no declared method is called.

use crate::class::{BenchClass, HookResult, MethodTable};
use crate::element::{BenchDecl, ClassInfo, ClassLayout, HookSet, MethodId, Origin};
use crate::error::ValidationError;
use crate::role::Role;

/// A validated class together with the table used to call into it
pub struct DiscoveredClass<T> {
    layout: ClassLayout,
    table: MethodTable<T>,
}

impl<T> DiscoveredClass<T> {
    /// Validated shape
    pub fn layout(&self) -> &ClassLayout {
        &self.layout
    }

    /// Build a fresh instance through the declared constructor
    pub fn construct(&self) -> Option<T> {
        self.table.construct()
    }

    /// Call a method of this class
    pub fn invoke(&self, method: &MethodId, instance: Option<&mut T>) -> HookResult {
        self.table.invoke(method.index, instance)
    }
}

/// Describe and validate `T`.
///
/// Returns `Ok(None)` when the class declares no benchmarked method: such a
/// class is excluded without error.
pub fn discover<T: BenchClass>(
    origin: Origin,
) -> Result<Option<DiscoveredClass<T>>, ValidationError> {
    let mut table = MethodTable::<T>::new();
    T::describe(&mut table);

    let layout = validate(&table, origin)?;
    if layout.is_none() {
        tracing::debug!(class = table.class_name(), "no benchmarked methods, skipping");
    }
    Ok(layout.map(|layout| DiscoveredClass { layout, table }))
}

/// Check a method table against the structural rules.
pub fn validate<T>(
    table: &MethodTable<T>,
    origin: Origin,
) -> Result<Option<ClassLayout>, ValidationError> {
    let class = table.class_name;
    let info = ClassInfo {
        name: class,
        type_id: table.type_id,
    };
    let id_of = |index: usize| MethodId {
        class: info,
        name: table.methods[index].name,
        index,
    };

    if !table.methods.iter().any(|m| m.has_role(Role::Bench)) {
        return Ok(None);
    }

    for (i, decl) in table.methods.iter().enumerate() {
        if table.methods[..i].iter().any(|m| m.name == decl.name) {
            return Err(ValidationError::DuplicateMethod {
                class,
                method: decl.name,
            });
        }
    }

    let mut hooks = HookSet::default();
    for role in Role::HOOKS {
        let mut carriers = table
            .methods
            .iter()
            .enumerate()
            .filter(|(_, m)| m.has_role(role));

        if let Some((index, first)) = carriers.next() {
            if let Some((_, second)) = carriers.next() {
                return Err(ValidationError::DuplicateHook {
                    class,
                    role,
                    first: first.name,
                    second: second.name,
                });
            }
            if let Some(slot) = hooks.slot_mut(role) {
                *slot = Some(id_of(index));
            }
        }
    }

    if origin == Origin::Class && table.constructor.is_none() {
        if let Some(decl) = table.methods.iter().find(|m| m.func.needs_instance()) {
            return Err(ValidationError::MissingConstructor {
                class,
                method: decl.name,
            });
        }
    }

    if table.default_runs == Some(0) {
        return Err(ValidationError::ZeroRuns {
            class,
            target: "default_runs",
        });
    }

    let resolve = |method: &'static str, role: Role, target: Option<&'static str>| {
        target
            .map(|target| {
                table
                    .methods
                    .iter()
                    .position(|m| m.name == target)
                    .map(id_of)
                    .ok_or(ValidationError::UnknownHook {
                        class,
                        method,
                        role,
                        target,
                    })
            })
            .transpose()
    };

    let mut benches = Vec::new();
    for (index, decl) in table.methods.iter().enumerate() {
        if !decl.has_role(Role::Bench) {
            continue;
        }
        if decl.runs == Some(0) {
            return Err(ValidationError::ZeroRuns {
                class,
                target: decl.name,
            });
        }
        benches.push(BenchDecl {
            method: id_of(index),
            runs: decl.runs,
            before_each_run: resolve(decl.name, Role::BeforeEachRun, decl.before_each)?,
            after_each_run: resolve(decl.name, Role::AfterEachRun, decl.after_each)?,
        });
    }

    Ok(Some(ClassLayout {
        info,
        origin,
        default_runs: table.default_runs,
        hooks,
        benches,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Complete;

    impl Complete {
        fn noop(&mut self) -> HookResult {
            Ok(())
        }
    }

    impl BenchClass for Complete {
        fn describe(t: &mut MethodTable<Self>) {
            t.constructor(Self::default);
            t.hook(Role::BeforeBenchClass, "before_class", Self::noop);
            t.hook(Role::BeforeFirstRun, "before_first", Self::noop);
            t.hook(Role::BeforeEachRun, "before_each", Self::noop);
            t.bench("bench", Self::noop);
            t.hook(Role::AfterEachRun, "after_each", Self::noop);
            t.hook(Role::AfterLastRun, "after_last", Self::noop);
            t.hook(Role::AfterBenchClass, "after_class", Self::noop);
        }
    }

    struct NoBench;

    impl BenchClass for NoBench {
        fn describe(t: &mut MethodTable<Self>) {
            t.hook(Role::BeforeEachRun, "setup", |_| Ok(()));
        }
    }

    struct TwoSetups;

    impl BenchClass for TwoSetups {
        fn describe(t: &mut MethodTable<Self>) {
            t.hook(Role::BeforeEachRun, "a", |_| Ok(()));
            t.hook(Role::BeforeEachRun, "b", |_| Ok(()));
            t.bench("bench", |_| Ok(()));
        }
    }

    struct NoConstructor;

    impl BenchClass for NoConstructor {
        fn describe(t: &mut MethodTable<Self>) {
            t.bench("bench", |_| Ok(()));
        }
    }

    struct StaticOnly;

    impl BenchClass for StaticOnly {
        fn describe(t: &mut MethodTable<Self>) {
            t.static_method("bench", || Ok(())).role(Role::Bench);
        }
    }

    struct DanglingOverride;

    impl BenchClass for DanglingOverride {
        fn describe(t: &mut MethodTable<Self>) {
            t.constructor(|| DanglingOverride);
            t.bench("bench", |_| Ok(())).before_each("missing");
        }
    }

    #[test]
    fn test_complete_class() {
        let discovered = discover::<Complete>(Origin::Class).unwrap().unwrap();
        let layout = discovered.layout();

        assert_eq!(layout.info.name, "Complete");
        assert_eq!(layout.benches.len(), 1);
        for role in Role::HOOKS {
            assert!(layout.hooks.get(role).is_some(), "{role} should be resolved");
        }
        assert_eq!(layout.hooks.get(Role::AfterLastRun).map(|m| m.index), Some(5));
    }

    #[test]
    fn test_class_without_bench_is_excluded() {
        assert!(discover::<NoBench>(Origin::Class).unwrap().is_none());
    }

    #[test]
    fn test_duplicate_hook_rejected() {
        let err = discover::<TwoSetups>(Origin::Object).err().unwrap();
        assert_eq!(
            err,
            ValidationError::DuplicateHook {
                class: "TwoSetups",
                role: Role::BeforeEachRun,
                first: "a",
                second: "b",
            }
        );
    }

    #[test]
    fn test_missing_constructor_only_for_class_origin() {
        assert!(matches!(
            discover::<NoConstructor>(Origin::Class),
            Err(ValidationError::MissingConstructor { method: "bench", .. })
        ));
        assert!(discover::<NoConstructor>(Origin::Object).unwrap().is_some());
    }

    #[test]
    fn test_static_only_class_needs_no_constructor() {
        let discovered = discover::<StaticOnly>(Origin::Class).unwrap().unwrap();
        let bench = discovered.layout().benches[0].method;
        assert!(discovered.invoke(&bench, None).is_ok());
    }

    #[test]
    fn test_unknown_hook_reference() {
        assert!(matches!(
            discover::<DanglingOverride>(Origin::Class),
            Err(ValidationError::UnknownHook {
                target: "missing",
                role: Role::BeforeEachRun,
                ..
            })
        ));
    }

    #[test]
    fn test_duplicate_method_and_zero_runs() {
        let mut table = MethodTable::<Complete>::new();
        table.bench("x", Complete::noop);
        table.method("x", Complete::noop);
        assert!(matches!(
            validate(&table, Origin::Object),
            Err(ValidationError::DuplicateMethod { method: "x", .. })
        ));

        let mut table = MethodTable::<Complete>::new();
        table.bench("x", Complete::noop).runs(0);
        assert!(matches!(
            validate(&table, Origin::Object),
            Err(ValidationError::ZeroRuns { target: "x", .. })
        ));
    }
}
