//! Benchmark class declaration
//!
//! A benchmark class describes itself once through a [`MethodTable`]: which
//! methods exist and which lifecycle roles they carry. The table is plain
//! data; building it never runs any declared method.

use crate::role::Role;
use std::any::TypeId;

/// Error type returned by benchmark and hook methods
pub type HookError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Return type of benchmark and hook methods
pub type HookResult = Result<(), HookError>;

/// A type whose methods can be benchmarked.
///
/// ```
/// use meterbench_core::{BenchClass, HookResult, MethodTable, Role};
///
/// #[derive(Default)]
/// struct VecPush {
///     data: Vec<u64>,
/// }
///
/// impl VecPush {
///     fn clear(&mut self) -> HookResult {
///         self.data.clear();
///         Ok(())
///     }
///
///     fn push_1k(&mut self) -> HookResult {
///         self.data.extend(0..1_000);
///         Ok(())
///     }
/// }
///
/// impl BenchClass for VecPush {
///     fn describe(table: &mut MethodTable<Self>) {
///         table.constructor(Self::default);
///         table.hook(Role::BeforeEachRun, "clear", Self::clear);
///         table.bench("push_1k", Self::push_1k).runs(50);
///     }
/// }
/// ```
pub trait BenchClass: Sized + 'static {
    /// Declare methods and their roles
    fn describe(table: &mut MethodTable<Self>);
}

/// Callable behind a declared method
pub enum MethodFn<T> {
    /// Needs an instance of the class
    Instance(fn(&mut T) -> HookResult),
    /// Free function; runs without an instance
    Static(fn() -> HookResult),
}

impl<T> Clone for MethodFn<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for MethodFn<T> {}

impl<T> MethodFn<T> {
    /// Whether an instance is required to call this
    pub fn needs_instance(&self) -> bool {
        matches!(self, MethodFn::Instance(_))
    }
}

/// One declared method
pub struct MethodDecl<T> {
    pub(crate) name: &'static str,
    pub(crate) roles: Vec<Role>,
    pub(crate) func: MethodFn<T>,
    pub(crate) runs: Option<usize>,
    pub(crate) before_each: Option<&'static str>,
    pub(crate) after_each: Option<&'static str>,
}

impl<T> MethodDecl<T> {
    /// Add a role marker
    pub fn role(&mut self, role: Role) -> &mut Self {
        if !self.roles.contains(&role) {
            self.roles.push(role);
        }
        self
    }

    /// Run count of this benchmarked method, overriding the class default
    pub fn runs(&mut self, runs: usize) -> &mut Self {
        self.runs = Some(runs);
        self
    }

    /// Use the named method as per-run setup for this benchmark only
    pub fn before_each(&mut self, method: &'static str) -> &mut Self {
        self.before_each = Some(method);
        self
    }

    /// Use the named method as per-run teardown for this benchmark only
    pub fn after_each(&mut self, method: &'static str) -> &mut Self {
        self.after_each = Some(method);
        self
    }

    /// Declared name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Role markers carried
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// Whether this method carries `role`
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// Method table of one benchmark class
pub struct MethodTable<T> {
    pub(crate) class_name: &'static str,
    pub(crate) type_id: TypeId,
    pub(crate) default_runs: Option<usize>,
    pub(crate) constructor: Option<fn() -> T>,
    pub(crate) methods: Vec<MethodDecl<T>>,
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

impl<T: 'static> MethodTable<T> {
    /// Empty table named after the type
    pub fn new() -> Self {
        Self {
            class_name: short_type_name::<T>(),
            type_id: TypeId::of::<T>(),
            default_runs: None,
            constructor: None,
            methods: Vec::new(),
        }
    }
}

impl<T: 'static> Default for MethodTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MethodTable<T> {
    /// Override the class name shown in results
    pub fn name(&mut self, name: &'static str) -> &mut Self {
        self.class_name = name;
        self
    }

    /// Run count for benchmarked methods without their own
    pub fn default_runs(&mut self, runs: usize) -> &mut Self {
        self.default_runs = Some(runs);
        self
    }

    /// How to build a fresh instance when the class is added by reference
    pub fn constructor(&mut self, constructor: fn() -> T) -> &mut Self {
        self.constructor = Some(constructor);
        self
    }

    fn push(&mut self, name: &'static str, func: MethodFn<T>) -> &mut MethodDecl<T> {
        self.methods.push(MethodDecl {
            name,
            roles: Vec::new(),
            func,
            runs: None,
            before_each: None,
            after_each: None,
        });
        let last = self.methods.len() - 1;
        &mut self.methods[last]
    }

    /// Declare an instance method without roles
    pub fn method(
        &mut self,
        name: &'static str,
        func: fn(&mut T) -> HookResult,
    ) -> &mut MethodDecl<T> {
        self.push(name, MethodFn::Instance(func))
    }

    /// Declare a free function without roles
    pub fn static_method(
        &mut self,
        name: &'static str,
        func: fn() -> HookResult,
    ) -> &mut MethodDecl<T> {
        self.push(name, MethodFn::Static(func))
    }

    /// Declare a benchmarked instance method
    pub fn bench(
        &mut self,
        name: &'static str,
        func: fn(&mut T) -> HookResult,
    ) -> &mut MethodDecl<T> {
        self.method(name, func).role(Role::Bench)
    }

    /// Declare a lifecycle hook on an instance method
    pub fn hook(
        &mut self,
        role: Role,
        name: &'static str,
        func: fn(&mut T) -> HookResult,
    ) -> &mut MethodDecl<T> {
        self.method(name, func).role(role)
    }

    /// Class name
    pub fn class_name(&self) -> &'static str {
        self.class_name
    }

    /// Declared methods in declaration order
    pub fn methods(&self) -> &[MethodDecl<T>] {
        &self.methods
    }

    /// Build a fresh instance, if a constructor was declared
    pub fn construct(&self) -> Option<T> {
        self.constructor.map(|ctor| ctor())
    }

    /// Call the method at `index` on `instance`.
    ///
    /// Validation guarantees instance methods only exist where an instance
    /// will be present; a missing receiver is reported as an error anyway.
    pub fn invoke(&self, index: usize, instance: Option<&mut T>) -> HookResult {
        let decl = self
            .methods
            .get(index)
            .ok_or_else(|| format!("{}: no method at index {index}", self.class_name))?;

        match (decl.func, instance) {
            (MethodFn::Static(f), _) => f(),
            (MethodFn::Instance(f), Some(instance)) => f(instance),
            (MethodFn::Instance(_), None) => {
                Err(format!("{}#{}: no instance to call on", self.class_name, decl.name).into())
            }
        }
    }
}
