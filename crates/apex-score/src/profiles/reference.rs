//! Static reference data the generator draws from.

/// City entry with the coordinates profiles are scattered around.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CityReference {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

/// Country entry linking cities, currency, lenders and network providers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountryReference {
    pub name: &'static str,
    pub code: &'static str,
    pub region: &'static str,
    pub currency: &'static str,
    pub dial_code: &'static str,
    pub cities: &'static [CityReference],
    pub streets: &'static [&'static str],
    pub banks: &'static [&'static str],
    pub isps: &'static [&'static str],
    pub ip_prefixes: &'static [[u8; 2]],
    /// Inclusive loan amount bounds in whole currency units.
    pub loan_amount: (u64, u64),
}

pub static COUNTRIES: &[CountryReference] = &[
    CountryReference {
        name: "Nigeria",
        code: "NG",
        region: "West Africa",
        currency: "NGN",
        dial_code: "+234",
        cities: &[
            CityReference { name: "Lagos", lat: 6.4541, lng: 3.3947 },
            CityReference { name: "Abuja", lat: 9.0765, lng: 7.3986 },
            CityReference { name: "Ibadan", lat: 7.3775, lng: 3.9470 },
            CityReference { name: "Port Harcourt", lat: 4.8156, lng: 7.0498 },
        ],
        streets: &["Broad Street", "Awolowo Road", "Allen Avenue", "Adeola Odeku Street"],
        banks: &["FirstBank Nigeria", "Access Bank", "Zenith Bank", "GTBank", "UBA"],
        isps: &["MTN Nigeria", "Airtel Nigeria", "Glo Mobile", "Spectranet"],
        ip_prefixes: &[[102, 89], [105, 112], [197, 210]],
        loan_amount: (50_000, 2_000_000),
    },
    CountryReference {
        name: "Kenya",
        code: "KE",
        region: "East Africa",
        currency: "KES",
        dial_code: "+254",
        cities: &[
            CityReference { name: "Nairobi", lat: -1.2864, lng: 36.8172 },
            CityReference { name: "Mombasa", lat: -4.0435, lng: 39.6682 },
            CityReference { name: "Kisumu", lat: -0.0917, lng: 34.7680 },
        ],
        streets: &["Moi Avenue", "Kenyatta Avenue", "Ngong Road", "Tom Mboya Street"],
        banks: &["Kenya Commercial Bank", "Equity Bank", "M-Pesa Fuliza", "Co-operative Bank"],
        isps: &["Safaricom", "Airtel Kenya", "Telkom Kenya", "Zuku"],
        ip_prefixes: &[[41, 90], [105, 160], [196, 201]],
        loan_amount: (10_000, 500_000),
    },
    CountryReference {
        name: "Ghana",
        code: "GH",
        region: "West Africa",
        currency: "GHS",
        dial_code: "+233",
        cities: &[
            CityReference { name: "Accra", lat: 5.5557, lng: -0.1963 },
            CityReference { name: "Kumasi", lat: 6.6885, lng: -1.6244 },
            CityReference { name: "Tamale", lat: 9.4034, lng: -0.8424 },
        ],
        streets: &["Oxford Street", "Liberation Road", "Ring Road Central", "Kojo Thompson Road"],
        banks: &["GCB Bank", "Ecobank Ghana", "Absa Ghana", "Fidelity Bank Ghana"],
        isps: &["MTN Ghana", "Vodafone Ghana", "AirtelTigo"],
        ip_prefixes: &[[41, 66], [154, 160], [197, 251]],
        loan_amount: (2_000, 80_000),
    },
    CountryReference {
        name: "South Africa",
        code: "ZA",
        region: "Southern Africa",
        currency: "ZAR",
        dial_code: "+27",
        cities: &[
            CityReference { name: "Johannesburg", lat: -26.2041, lng: 28.0473 },
            CityReference { name: "Cape Town", lat: -33.9249, lng: 18.4241 },
            CityReference { name: "Durban", lat: -29.8587, lng: 31.0218 },
        ],
        streets: &["Long Street", "Jan Smuts Avenue", "Florida Road", "Commissioner Street"],
        banks: &["Standard Bank", "Capitec", "FNB", "Nedbank"],
        isps: &["Vodacom", "MTN South Africa", "Telkom", "Rain"],
        ip_prefixes: &[[41, 13], [105, 224], [196, 21]],
        loan_amount: (1_000, 150_000),
    },
];

pub static FIRST_NAMES: &[&str] = &[
    "Chidi", "Amina", "Kwame", "Fatima", "Tunde", "Wanjiru", "Kofi", "Zanele", "Emeka", "Achieng",
    "Yaw", "Thandiwe", "Ngozi", "Baraka", "Abena", "Sipho",
];

pub static MIDDLE_NAMES: &[&str] = &[
    "Oluwaseun", "Imani", "Kojo", "Nomvula", "Ifeanyi", "Wambui", "Esi", "Lerato", "Chinedu",
    "Akinyi",
];

pub static LAST_NAMES: &[&str] = &[
    "Okonkwo", "Hassan", "Boateng", "Mwangi", "Adeyemi", "Dlamini", "Mensah", "Otieno", "Nwosu",
    "Khumalo", "Asante", "Kamau",
];

pub static OCCUPATIONS: &[&str] = &[
    "Shop Owner",
    "Market Vendor",
    "Taxi Driver",
    "Tailor",
    "Farmer",
    "Teacher",
    "Mechanic",
    "Hairdresser",
    "Nurse",
    "Boda Boda Rider",
];

pub static LOAN_PURPOSES: &[&str] = &[
    "Working capital",
    "Inventory purchase",
    "Equipment",
    "School fees",
    "Medical expenses",
    "Home improvement",
    "Vehicle purchase",
];

pub static DEVICE_MODELS: &[&str] = &[
    "Tecno Spark 10",
    "Infinix Hot 30",
    "Samsung Galaxy A14",
    "itel A70",
    "Xiaomi Redmi 12C",
    "Nokia C32",
];

pub static OS_VERSIONS: &[&str] = &["Android 11", "Android 12", "Android 13", "Android 14"];
