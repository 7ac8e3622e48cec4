use std::cmp;
use std::fmt;
use std::sync::Arc;

/// A caller-supplied comparator used by [`Ordering::Custom`].
pub struct Comparator<T: ?Sized>(Arc<dyn Fn(&T, &T) -> cmp::Ordering + Send + Sync>);

impl<T: ?Sized> Comparator<T> {
    /// Wraps a comparison function.
    pub fn new(compare: impl Fn(&T, &T) -> cmp::Ordering + Send + Sync + 'static) -> Self {
        Self(Arc::new(compare))
    }

    /// Compares two entities.
    pub fn compare(&self, left: &T, right: &T) -> cmp::Ordering {
        (self.0)(left, right)
    }
}

impl<T: ?Sized> Clone for Comparator<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: ?Sized> fmt::Debug for Comparator<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("Comparator(..)")
    }
}

/// How a family of entities (operations, parameters, tags...) is ordered.
///
/// A custom ordering always carries its comparator, so "custom without comparator" cannot be
/// configured.
pub enum Ordering<T: ?Sized> {
    /// Canonical ordering of the entity kind, see [`NaturalOrder`](crate::NaturalOrder).
    Natural,
    /// Declaration order of the input model.
    AsIs,
    /// Caller-supplied comparator.
    Custom(Comparator<T>),
}

impl<T: ?Sized> Ordering<T> {
    /// Builds a custom ordering from a comparison function.
    pub fn custom(compare: impl Fn(&T, &T) -> cmp::Ordering + Send + Sync + 'static) -> Self {
        Self::Custom(Comparator::new(compare))
    }
}

impl<T: ?Sized> Clone for Ordering<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Natural => Self::Natural,
            Self::AsIs => Self::AsIs,
            Self::Custom(comparator) => Self::Custom(comparator.clone()),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Ordering<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Natural => formatter.write_str("Natural"),
            Self::AsIs => formatter.write_str("AsIs"),
            Self::Custom(comparator) => formatter.debug_tuple("Custom").field(comparator).finish(),
        }
    }
}

/// The serializable subset of [`Ordering`], used by settings files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderBy {
    /// See [`Ordering::Natural`].
    #[default]
    Natural,
    /// See [`Ordering::AsIs`].
    AsIs,
}

impl<T: ?Sized> From<OrderBy> for Ordering<T> {
    fn from(order_by: OrderBy) -> Self {
        match order_by {
            OrderBy::Natural => Self::Natural,
            OrderBy::AsIs => Self::AsIs,
        }
    }
}
