/// Register definitions
pub struct Register;
impl Register {
    pub const MAIN_CTRL: u8 = 0x00;
    pub const ALS_MEAS_RATE: u8 = 0x04;
    pub const ALS_GAIN: u8 = 0x05;
    pub const PART_ID: u8 = 0x06;
    pub const MAIN_STATUS: u8 = 0x07;
    pub const CLEAR_DATA_0: u8 = 0x0A;
    pub const CLEAR_DATA_1: u8 = 0x0B;
    pub const CLEAR_DATA_2: u8 = 0x0C;
    pub const ALS_DATA_0: u8 = 0x0D;
    pub const ALS_DATA_1: u8 = 0x0E;
    pub const ALS_DATA_2: u8 = 0x0F;
    pub const INT_CFG: u8 = 0x19;
    pub const INT_PST: u8 = 0x1A;
    pub const ALS_THRES_UP_0: u8 = 0x21;
    pub const ALS_THRES_UP_1: u8 = 0x22;
    pub const ALS_THRES_UP_2: u8 = 0x23;
    pub const ALS_THRES_LOW_0: u8 = 0x24;
    pub const ALS_THRES_LOW_1: u8 = 0x25;
    pub const ALS_THRES_LOW_2: u8 = 0x26;
}

/// MAIN_CTRL bit 1 enables the ALS. The remaining MAIN_CTRL bits must
/// survive our read-modify-write untouched.
pub const MAIN_CTRL_ALS_ENABLE: u8 = 0x02;

// MAIN_STATUS bit positions.
pub const MAIN_STATUS_DATA: u8 = 1 << 3;
pub const MAIN_STATUS_INT: u8 = 1 << 4;
pub const MAIN_STATUS_POWER_ON: u8 = 1 << 5;
