//! Command vocabulary of the controller
//!
//! The answer verb rarely matches the request verb: a login request
//! (`LIN`) is acknowledged with `OK`, a fault list query (`AR`) with one
//! `AA` frame per entry, a fast query (`MR`) with `MA` frames. Each
//! operation therefore carries its own answer pattern. Patterns that
//! embed request arguments (parameter reads, time program entries) are
//! built per call.

use once_cell::sync::Lazy;
use regex::Regex;

/// Login request.
pub const LOGIN_CMD: &str = "LIN";
/// Logout request.
pub const LOGOUT_CMD: &str = "LOUT";
/// Query for the manufacturer's serial number.
pub const RID_CMD: &str = "RID";
/// Query for the software version, a plain parameter read.
pub const VERSION_CMD: &str = "SP,NR=9";
/// Query for the current date and time.
pub const CLK_CMD: &str = "CLK";
/// Query for the last fault message.
pub const ALC_CMD: &str = "ALC";
/// Query for the fault list size.
pub const ALS_CMD: &str = "ALS";
/// Query for specific fault list entries, extended with `,{idx}` per entry.
pub const AR_CMD: &str = "AR";
/// Fast query for several MP data point values, extended with `,{nr}`.
pub const MR_CMD: &str = "MR";
/// Query for the time programs of the controller.
pub const PRL_CMD: &str = "PRL";

fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("static pattern")
}

/// `LIN` and `LOUT` acknowledge; e.g. `OK`.
pub static OK_RESP: Lazy<Regex> = Lazy::new(|| pattern(r"^OK"));

/// `RID` answer; e.g. `RID,123456`.
pub static RID_RESP: Lazy<Regex> = Lazy::new(|| pattern(r"^RID,(\d+)$"));

/// `SP,NR=9` answer; e.g. `SP,NR=9,ID=9,NAME=3.0.20,...,VAL=2321,...`.
pub static VERSION_RESP: Lazy<Regex> =
    Lazy::new(|| pattern(r"^SP,NR=9,.*NAME=([^,]+).*VAL=([^,]+).*$"));

/// `CLK` answer; e.g. `CLK,DA=26.11.15,TI=21:28:57,WD=4`.
pub static CLK_RESP: Lazy<Regex> = Lazy::new(|| {
    pattern(
        r"^CLK,DA=(3[0-1]|[1-2]\d|0[1-9])\.(1[0-2]|0[1-9])\.(\d\d),TI=([0-1]\d|2[0-3]):([0-5]\d):([0-5]\d),WD=([1-7])$",
    )
});

/// `ALC` and `AR` answer, one frame per fault list entry;
/// e.g. `AA,29,20,14.09.14-11:52:08,EQ_Spreizung`.
///
/// Date and time validity is checked by the timestamp parser.
pub static FAULT_RESP: Lazy<Regex> =
    Lazy::new(|| pattern(r"^AA,(\d+),(\d+),(\d\d\.\d\d\.\d\d)-(\d\d:\d\d:\d\d),(.*)$"));

/// `ALS` and `PRL` answer; e.g. `SUM=2757`.
pub static SUM_RESP: Lazy<Regex> = Lazy::new(|| pattern(r"^SUM=(\d+)$"));

/// `MR` answer, one frame per queried data point; e.g. `MA,0,-3.4,17`.
pub static MA_RESP: Lazy<Regex> = Lazy::new(|| pattern(r"^MA,(\d+),([^,]+),(\d+)$"));

/// Set request for the date and time.
pub fn clk_set_cmd(day: u32, month: u32, year: u32, hour: u32, min: u32, sec: u32, wd: u32) -> String {
    format!("CLK,DA={day:02}.{month:02}.{year:02},TI={hour:02}:{min:02}:{sec:02},WD={wd}")
}

/// Answer pattern of a parameter read or write.
///
/// The data point echoes its own command followed by name, value and the
/// current limits; e.g.
/// `SP,NR=69,ID=69,NAME=HKR Soll_Raum,...,VAL=21.5,MAX=25.0,MIN=10.0`.
pub fn param_resp(command: &str) -> Regex {
    pattern(&format!(
        r"^{},.*NAME=([^,]+).*VAL=([^,]+).*MAX=([^,]+).*MIN=([^,]+).*$",
        regex::escape(command)
    ))
}

/// Query for a time program header.
pub fn pri_cmd(index: u32) -> String {
    format!("PRI{index}")
}

/// Answer pattern of a time program header; e.g.
/// `PRI0,NAME=Warmwasser,EAD=7,NOS=2,STE=15,NOD=7,ACS=rw`.
pub fn pri_resp(index: u32) -> Regex {
    pattern(&format!(
        r"^PRI{index},.*NAME=([^,]+).*EAD=([^,]+).*NOS=([^,]+).*STE=([^,]+).*NOD=([^,]+).*$"
    ))
}

/// Query for a time program with all its entries.
pub fn prd_cmd(index: u32) -> String {
    format!("PRD{index}")
}

/// Get request for a single time program entry.
pub fn pre_get_cmd(index: u32, day: u32, entry: u32) -> String {
    format!("PRE,PR={index},DAY={day},EV={entry}")
}

/// Set request for a single time program entry.
pub fn pre_set_cmd(index: u32, day: u32, entry: u32, state: u8, begin: &str, end: &str) -> String {
    format!("PRE,PR={index},DAY={day},EV={entry},ST={state},BEG={begin},END={end}")
}

/// Answer pattern of a time program entry; e.g.
/// `PRE,PR=2,DAY=5,EV=4,ST=1,BEG=06:00,END=22:00`.
pub fn pre_resp(index: u32, day: u32, entry: u32) -> Regex {
    pattern(&format!(
        r"^PRE,.*PR={index},.*DAY={day},.*EV={entry},.*ST=(\d+),.*BEG=(\d?\d:\d?\d),.*END=(\d?\d:\d?\d).*$"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_pattern() {
        let caps = VERSION_RESP
            .captures("SP,NR=9,ID=9,NAME=3.0.20,LEN=4,TP=0,BIT=0,VAL=2321,MAX=0,MIN=0,WR=0,US=1")
            .unwrap();
        assert_eq!(&caps[1], "3.0.20");
        assert_eq!(&caps[2], "2321");
    }

    #[test]
    fn test_clk_pattern() {
        let caps = CLK_RESP
            .captures("CLK,DA=26.11.15,TI=21:28:57,WD=4")
            .unwrap();
        assert_eq!(&caps[1], "26");
        assert_eq!(&caps[6], "57");
        assert_eq!(&caps[7], "4");
        assert!(CLK_RESP.captures("CLK,DA=32.11.15,TI=21:28:57,WD=4").is_none());
    }

    #[test]
    fn test_fault_pattern() {
        let caps = FAULT_RESP
            .captures("AA,29,20,14.09.14-11:52:08,EQ_Spreizung")
            .unwrap();
        assert_eq!(&caps[1], "29");
        assert_eq!(&caps[2], "20");
        assert_eq!(&caps[3], "14.09.14");
        assert_eq!(&caps[4], "11:52:08");
        assert_eq!(&caps[5], "EQ_Spreizung");
    }

    #[test]
    fn test_param_pattern_escapes_the_command() {
        let re = param_resp("SP,NR=69");
        let caps = re
            .captures("SP,NR=69,ID=69,NAME=HKR Soll_Raum,LEN=4,TP=0,BIT=0,VAL=21.5,MAX=25.0,MIN=10.0,WR=1,US=1")
            .unwrap();
        assert_eq!(&caps[1], "HKR Soll_Raum");
        assert_eq!(&caps[2], "21.5");
        assert_eq!(&caps[3], "25.0");
        assert_eq!(&caps[4], "10.0");
        assert!(re.captures("SP,NR=690,NAME=x,VAL=1,MAX=2,MIN=0").is_none());
    }

    #[test]
    fn test_time_program_patterns() {
        let caps = pri_resp(2)
            .captures("PRI2,NAME=Zirkulationspumpe,EAD=7,NOS=2,STE=15,NOD=7,ACS=rw")
            .unwrap();
        assert_eq!(&caps[1], "Zirkulationspumpe");
        assert_eq!(&caps[5], "7");
        let caps = pre_resp(2, 5, 4)
            .captures("PRE,PR=2,DAY=5,EV=4,ST=1,BEG=06:00,END=22:00")
            .unwrap();
        assert_eq!(&caps[1], "1");
        assert_eq!(&caps[2], "06:00");
        assert_eq!(&caps[3], "22:00");
    }
}
