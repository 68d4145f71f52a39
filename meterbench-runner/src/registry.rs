//! Type-erased class slots
//!
//! The coordinator keeps classes of different types side by side; the engine
//! only needs their layout and a way to call a method by id.

use meterbench_core::{ClassLayout, DiscoveredClass, HookResult, MethodId, Origin};

/// A registered class, generic parameter erased
pub(crate) trait ErasedClass {
    /// Validated shape
    fn layout(&self) -> &ClassLayout;

    /// Prepare the instance for a class run
    fn open(&mut self) -> HookResult;

    /// Call a declared method
    fn call(&mut self, method: &MethodId) -> HookResult;

    /// End of the class run; constructed instances are dropped here
    fn release(&mut self);
}

pub(crate) struct ClassSlot<T> {
    class: DiscoveredClass<T>,
    instance: Option<T>,
}

impl<T> ClassSlot<T> {
    /// Slot for a class added by reference
    pub(crate) fn by_class(class: DiscoveredClass<T>) -> Self {
        Self {
            class,
            instance: None,
        }
    }

    /// Slot owning a live object
    pub(crate) fn by_object(class: DiscoveredClass<T>, object: T) -> Self {
        Self {
            class,
            instance: Some(object),
        }
    }
}

impl<T> ErasedClass for ClassSlot<T> {
    fn layout(&self) -> &ClassLayout {
        self.class.layout()
    }

    fn open(&mut self) -> HookResult {
        if self.class.layout().origin == Origin::Class {
            self.instance = self.class.construct();
        }
        Ok(())
    }

    fn call(&mut self, method: &MethodId) -> HookResult {
        self.class.invoke(method, self.instance.as_mut())
    }

    fn release(&mut self) {
        if self.class.layout().origin == Origin::Class {
            self.instance = None;
        }
    }
}
