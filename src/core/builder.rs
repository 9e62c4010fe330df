use super::countries::CountryCode;
use super::types::*;

/// Builder for [`Party`] (seller/buyer).
///
/// ```
/// use zugferd_invoice::core::*;
///
/// let seller = PartyBuilder::new(
///     "AdventureWorks",
///     AddressBuilder::new("Austin, TX", "78721", "US".parse().unwrap())
///         .street("800 Interchange Blvd")
///         .build(),
/// )
/// .id("Adventure_123")
/// .contact_name("Adventure support")
/// .build();
/// assert_eq!(seller.address.country.as_str(), "US");
/// ```
pub struct PartyBuilder {
    id: Option<String>,
    legal_name: String,
    contact_name: Option<String>,
    address: Address,
}

impl PartyBuilder {
    pub fn new(legal_name: impl Into<String>, address: Address) -> Self {
        Self {
            id: None,
            legal_name: legal_name.into(),
            contact_name: None,
            address,
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn contact_name(mut self, name: impl Into<String>) -> Self {
        self.contact_name = Some(name.into());
        self
    }

    pub fn build(self) -> Party {
        Party {
            id: self.id,
            legal_name: self.legal_name,
            contact_name: self.contact_name,
            address: self.address,
        }
    }
}

/// Builder for [`Address`].
pub struct AddressBuilder {
    street: Option<String>,
    city: String,
    postal_code: String,
    country: CountryCode,
}

impl AddressBuilder {
    pub fn new(city: impl Into<String>, postal_code: impl Into<String>, country: CountryCode) -> Self {
        Self {
            street: None,
            city: city.into(),
            postal_code: postal_code.into(),
            country,
        }
    }

    pub fn street(mut self, street: impl Into<String>) -> Self {
        self.street = Some(street.into());
        self
    }

    pub fn build(self) -> Address {
        Address {
            street: self.street,
            city: self.city,
            postal_code: self.postal_code,
            country: self.country,
        }
    }
}
