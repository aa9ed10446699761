//! The fixed option sets offered by the form.

pub const CITIES: [&str; 7] = [
    "Bangalore",
    "Mumbai",
    "Delhi",
    "Hyderabad",
    "Chennai",
    "Pune",
    "Other",
];

pub const AGE_BRACKETS: [&str; 6] = [
    "Below 18",
    "18 - 25",
    "26 - 35",
    "36 - 45",
    "45 - 60",
    "60 and above",
];

/// Sentinel city choice that switches the form to free-text entry.
pub const OTHER_CITY: &str = "Other";
