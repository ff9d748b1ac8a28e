use std::fmt::Display;

/// Default ratio of entries to slots before the base map grows.
pub const DEFAULT_LOAD_FACTOR: f32 = 0.8;

/// Largest accepted initial capacity.
pub const MAX_INITIAL_CAPACITY: usize = 1 << 30;

/// Construction hints for an [`OrderedMap`](crate::OrderedMap).
///
/// # Example
/// ```
/// use orderedmap::{OrderedMap, OrderedMapOptions};
///
/// let options = OrderedMapOptions::new()
///     .initial_capacity(64)
///     .load_factor(0.5);
///
/// let map: OrderedMap<String, u32> = OrderedMap::with_options(options).unwrap();
/// assert!(map.is_empty());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderedMapOptions {
    initial_capacity: usize,
    load_factor: f32,
}

impl OrderedMapOptions {
    /// Creates options with no pre-allocation and the default load factor.
    pub fn new() -> Self {
        OrderedMapOptions {
            initial_capacity: 0,
            load_factor: DEFAULT_LOAD_FACTOR,
        }
    }

    /// Sets the number of entries to pre-allocate storage for.
    pub fn initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Sets the ratio of entries to slots at which the base map grows.
    pub fn load_factor(mut self, load_factor: f32) -> Self {
        self.load_factor = load_factor;
        self
    }

    /// Returns the number of entries to pre-allocate storage for.
    pub fn get_initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    /// Returns the ratio of entries to slots at which the base map grows.
    pub fn get_load_factor(&self) -> f32 {
        self.load_factor
    }

    /// Checks the options, returning the first invalid value.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if !self.load_factor.is_finite() || self.load_factor <= 0.0 || self.load_factor > 1.0 {
            return Err(OptionsError::InvalidLoadFactor(self.load_factor));
        }

        if self.initial_capacity > MAX_INITIAL_CAPACITY {
            return Err(OptionsError::CapacityTooLarge(self.initial_capacity));
        }

        Ok(())
    }
}

impl Default for OrderedMapOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// An invalid value in [`OrderedMapOptions`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OptionsError {
    InvalidLoadFactor(f32),
    CapacityTooLarge(usize),
}

impl Display for OptionsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionsError::InvalidLoadFactor(load_factor) => {
                write!(f, "load factor must be > 0 and <= 1, but was {load_factor}")
            }
            OptionsError::CapacityTooLarge(capacity) => write!(
                f,
                "initial capacity is too large: {capacity} (max {MAX_INITIAL_CAPACITY})"
            ),
        }
    }
}

impl std::error::Error for OptionsError {}
