//! Delivery order record.

use serde::{Deserialize, Serialize};

/// One customer delivery request.
///
/// Every field is free-form text. Absent fields deserialize to empty strings,
/// which covers both partially filled intake forms and older stored documents.
/// Orders are immutable once stored; there is no identity field because the
/// store's own key is never surfaced to callers.
///
/// ## Examples
///
/// ```
/// use order_locator_core::Order;
///
/// let order = Order::new("Alice", "555-1234", "1600 Amphitheatre Parkway", "morning");
/// assert_eq!(order.address, "1600 Amphitheatre Parkway");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Order {
    /// Customer name.
    pub name: String,
    /// Contact phone number, unvalidated.
    pub phone: String,
    /// Delivery address, used verbatim as geocoding input.
    pub address: String,
    /// Preferred delivery window as entered by the customer.
    pub preferable_delivery_time: String,
}

impl Order {
    /// Build an order from its four fields.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        address: impl Into<String>,
        preferable_delivery_time: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            address: address.into(),
            preferable_delivery_time: preferable_delivery_time.into(),
        }
    }

    /// Build an order from decoded form key/value pairs.
    ///
    /// The first value seen for each field wins and unknown keys are ignored.
    /// Fields that never appear stay empty.
    ///
    /// ```
    /// use order_locator_core::Order;
    ///
    /// let order = Order::from_form_pairs([("name", "Alice"), ("name", "Bob")]);
    /// assert_eq!(order.name, "Alice");
    /// assert!(order.address.is_empty());
    /// ```
    #[must_use]
    pub fn from_form_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut name: Option<String> = None;
        let mut phone: Option<String> = None;
        let mut address: Option<String> = None;
        let mut time: Option<String> = None;

        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "name" => &mut name,
                "phone" => &mut phone,
                "address" => &mut address,
                "preferable_delivery_time" => &mut time,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }

        Self {
            name: name.unwrap_or_default(),
            phone: phone.unwrap_or_default(),
            address: address.unwrap_or_default(),
            preferable_delivery_time: time.unwrap_or_default(),
        }
    }
}
