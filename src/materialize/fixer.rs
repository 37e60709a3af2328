use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexSet;

use super::{Bean, WeakBean};

/// Collections a one-to-many relation adds its related beans to.
pub trait BeanCollection<R> {
    fn add(&mut self, bean: Bean<R>);
}

/// Keeps the first occurrence of each bean.
impl<R> BeanCollection<R> for Vec<Bean<R>> {
    fn add(&mut self, bean: Bean<R>) {
        if !self.contains(&bean) {
            self.push(bean);
        }
    }
}

impl<R> BeanCollection<R> for HashSet<Bean<R>> {
    fn add(&mut self, bean: Bean<R>) {
        self.insert(bean);
    }
}

impl<R> BeanCollection<R> for IndexSet<Bean<R>> {
    fn add(&mut self, bean: Bean<R>) {
        self.insert(bean);
    }
}

/// Created on first addition.
impl<R, C> BeanCollection<R> for Option<C>
where
    C: BeanCollection<R> + Default,
{
    fn add(&mut self, bean: Bean<R>) {
        self.get_or_insert_with(C::default).add(bean);
    }
}

/// Wires a related bean into its owner.
pub struct BeanRelationFixer<T, R> {
    fix: Rc<dyn Fn(&Bean<T>, &Bean<R>)>,
}

impl<T: 'static, R: 'static> BeanRelationFixer<T, R> {
    pub fn new<F>(fix: F) -> Self
    where
        F: Fn(&Bean<T>, &Bean<R>) + 'static,
    {
        BeanRelationFixer { fix: Rc::new(fix) }
    }

    /// One-to-one: the related bean overwrites the owner's field.
    pub fn of<F>(field: F) -> Self
    where
        F: Fn(&mut T) -> &mut Option<Bean<R>> + 'static,
    {
        Self::new(move |owner, related| {
            *field(&mut owner.borrow_mut()) = Some(related.clone());
        })
    }

    /// One-to-many: the related bean is added to the owner's collection.
    ///
    /// ```rust
    /// # use sqlweave::materialize::*;
    /// struct Author { books: Option<Vec<Bean<String>>> }
    ///
    /// let fixer = BeanRelationFixer::of_many(|author: &mut Author| &mut author.books);
    /// let author = Bean::new(Author { books: None });
    /// let book = Bean::new(String::from("Dune"));
    ///
    /// fixer.fix(&author, &book);
    /// fixer.fix(&author, &book);
    ///
    /// assert_eq!(Some(1), author.borrow().books.as_ref().map(Vec::len));
    /// ```
    pub fn of_many<C, F>(field: F) -> Self
    where
        C: BeanCollection<R>,
        F: Fn(&mut T) -> &mut C + 'static,
    {
        Self::new(move |owner, related| {
            field(&mut owner.borrow_mut()).add(related.clone());
        })
    }

    /// A back reference that does not keep the related bean alive.
    pub fn of_weak<F>(field: F) -> Self
    where
        F: Fn(&mut T) -> &mut WeakBean<R> + 'static,
    {
        Self::new(move |owner, related| {
            *field(&mut owner.borrow_mut()) = related.downgrade();
        })
    }

    /// Also wires the owner into the related bean.
    pub fn with_reverse(self, reverse: BeanRelationFixer<R, T>) -> Self {
        let forward = self.fix;

        Self::new(move |owner, related| {
            forward(owner, related);
            reverse.fix(related, owner);
        })
    }

    pub fn fix(&self, owner: &Bean<T>, related: &Bean<R>) {
        (self.fix)(owner, related)
    }
}

impl<T, R> Clone for BeanRelationFixer<T, R> {
    fn clone(&self) -> Self {
        BeanRelationFixer {
            fix: Rc::clone(&self.fix),
        }
    }
}

impl<T, R> fmt::Debug for BeanRelationFixer<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BeanRelationFixer")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Author {
        name: &'static str,
        books: IndexSet<Bean<Book>>,
    }

    #[derive(Debug, Default)]
    struct Book {
        title: &'static str,
        author: WeakBean<Author>,
        best_seller_of: Option<Bean<Author>>,
    }

    #[test]
    fn bidirectional_one_to_many() {
        let fixer = BeanRelationFixer::of_many(|author: &mut Author| &mut author.books)
            .with_reverse(BeanRelationFixer::of_weak(|book: &mut Book| &mut book.author));

        let author = Bean::new(Author {
            name: "Herbert",
            ..Default::default()
        });
        let dune = Bean::new(Book {
            title: "Dune",
            ..Default::default()
        });

        fixer.fix(&author, &dune);
        fixer.fix(&author, &dune);

        assert_eq!(1, author.borrow().books.len());
        assert_eq!("Dune", author.borrow().books[0].borrow().title);
        assert_eq!(Some(author.clone()), dune.borrow().author.upgrade());
        assert_eq!("Herbert", author.borrow().name);
    }

    #[test]
    fn one_to_one_overwrites() {
        let fixer = BeanRelationFixer::of(|book: &mut Book| &mut book.best_seller_of);
        let book = Bean::new(Book::default());
        let first = Bean::new(Author::default());
        let second = Bean::new(Author::default());

        fixer.fix(&book, &first);
        fixer.fix(&book, &second);

        assert_eq!(Some(second), book.borrow().best_seller_of.clone());
    }
}
