pub const EXIT_CANCELLED: u8 = 130;
pub const SECURITY_TOKENS: [&str; 5] = ["open", "wep", "wpa", "wpa3", "hidden"];
pub const PROGRESS_BAR_WIDTH: usize = 30;
