use std::cell::{Ref, RefCell, RefMut};
use std::fmt::{self, Debug};
use std::hash::{Hash, Hasher};
use std::rc::{Rc, Weak};

/// A bean of the graph, shared by every bean referring to it.
///
/// Equality and hashing are by identity: two handles are equal when they
/// point to the same instance, whatever their content.
pub struct Bean<T>(pub(crate) Rc<RefCell<T>>);

impl<T> Bean<T> {
    pub fn new(value: T) -> Self {
        Bean(Rc::new(RefCell::new(value)))
    }

    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.0.borrow_mut()
    }

    /// A handle that does not keep the bean alive, for back references.
    pub fn downgrade(&self) -> WeakBean<T> {
        WeakBean(Rc::downgrade(&self.0))
    }

    pub fn ptr_eq(&self, other: &Bean<T>) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// The bean itself, if no other handle is left.
    pub fn try_unwrap(self) -> Result<T, Self> {
        Rc::try_unwrap(self.0)
            .map(RefCell::into_inner)
            .map_err(Bean)
    }

    pub(crate) fn address(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

impl<T> Clone for Bean<T> {
    fn clone(&self) -> Self {
        Bean(Rc::clone(&self.0))
    }
}

impl<T> PartialEq for Bean<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<T> Eq for Bean<T> {}

impl<T> Hash for Bean<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address().hash(state);
    }
}

impl<T: Debug> Debug for Bean<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(bean) => f.debug_tuple("Bean").field(&*bean).finish(),
            Err(_) => f.write_str("Bean(<borrowed>)"),
        }
    }
}

/// A non-owning handle to a [Bean].
pub struct WeakBean<T>(Weak<RefCell<T>>);

impl<T> WeakBean<T> {
    /// A handle to no bean.
    pub fn new() -> Self {
        WeakBean(Weak::new())
    }

    pub fn upgrade(&self) -> Option<Bean<T>> {
        self.0.upgrade().map(Bean)
    }
}

impl<T> Default for WeakBean<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for WeakBean<T> {
    fn clone(&self) -> Self {
        WeakBean(Weak::clone(&self.0))
    }
}

impl<T> Debug for WeakBean<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WeakBean")
    }
}
