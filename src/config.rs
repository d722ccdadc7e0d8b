//! Hardware and behaviour configuration for the Slotkeeper kiosk
//! RP2040 board with SSD1306 OLED, RGB LED, buzzer and three buttons

// ===================================================================
// Occupancy
// ===================================================================

pub const MAX_OCCUPANCY: u8 = 10; // Simultaneous service slots
pub const OVERFLOW_BEEPS: u8 = 1; // Beeps when an entry is rejected
pub const RESET_BEEPS: u8 = 2; // Beeps after a reset

// ===================================================================
// Timing
// ===================================================================

pub const BUTTON_POLL_MS: u32 = 100; // Entry/exit polling period
pub const BUTTON_DEBOUNCE_MS: u64 = 200; // Minimum quiet period between accepted presses
pub const LED_HOLD_MS: u32 = 150; // Time a colour is held before the next refresh
pub const BEEP_ON_MS: u32 = 100;
pub const BEEP_OFF_MS: u32 = 100;
pub const SUPERVISOR_TICK_SECS: u32 = 10;
pub const STATUS_INTERVAL_SECS: u32 = 60;

// ===================================================================
// GPIO Pin Assignments
// ===================================================================

// Buttons (active-low, internal pull-ups)
pub const BTN_ENTRY_PIN: u8 = 5; // Button A
pub const BTN_EXIT_PIN: u8 = 6; // Button B
pub const BTN_RESET_PIN: u8 = 22; // Joystick push

// RGB LED
pub const LED_RED_PIN: u8 = 13;
pub const LED_GREEN_PIN: u8 = 11;
pub const LED_BLUE_PIN: u8 = 12;

// Buzzer (PWM slice 2, channel B)
pub const BUZZER_PIN: u8 = 21;

// OLED on I2C1
pub const DISPLAY_SDA_PIN: u8 = 14;
pub const DISPLAY_SCL_PIN: u8 = 15;
pub const DISPLAY_I2C_ADDR: u8 = 0x3C;
pub const DISPLAY_I2C_FREQUENCY: u32 = 400_000;

// ===================================================================
// Buzzer PWM
// ===================================================================

pub const BUZZER_PWM_TOP: u16 = 1000; // Counter wrap value
pub const BUZZER_PWM_DIVIDER: u8 = 250; // Clock divider
pub const BUZZER_DUTY_PERCENT: u8 = 50; // Tone duty while beeping

// ===================================================================
// Display Layout (128x64 monochrome)
// ===================================================================

pub const DISPLAY_WIDTH: u32 = 128;
pub const DISPLAY_HEIGHT: u32 = 64;

pub const FRAME_ORIGIN: (i32, i32) = (3, 3);
pub const FRAME_SIZE: (u32, u32) = (122, 60);
pub const DIVIDER_ROWS: [i32; 2] = [25, 37];
pub const DIVIDER_SPAN: (i32, i32) = (3, 123);

pub const TITLE_POS: (i32, i32) = (13, 12);
pub const BANNER_POS: (i32, i32) = (8, 28);
pub const FREE_POS: (i32, i32) = (8, 41);
pub const OCCUPIED_POS: (i32, i32) = (8, 52);

pub const TITLE_TEXT: &str = "ATENDIMENTOS";
pub const BANNER_PROMPT_TEXT: &str = "Verifique!";
pub const BANNER_FULL_TEXT: &str = "Todos ocupados!";
pub const FREE_LABEL: &str = "Livres";
pub const OCCUPIED_LABEL: &str = "Ocupados";
pub const SCREEN_LINE_LEN: usize = 16;
