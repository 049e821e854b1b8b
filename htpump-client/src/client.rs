//! High level controller client
//!
//! `HtClient` drives a complete session against a heat pump controller:
//! connection lifecycle, login, parameter access, fault list queries and
//! time program management. Every operation is a request/response
//! exchange over the half duplex serial line; corrupted responses are
//! discarded and re-read up to a configurable bound.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use log::{debug, info, warn};
use regex::{Captures, Regex};

use htpump_catalog::{ParameterCatalog, ParameterDescriptor};
use htpump_core::{
    parse_wire_date_time, DataPointKind, FaultEntry, HtpError, HtpResult, TimeProgPeriod,
    TimeProgram, Value,
};
use htpump_protocol::{encode_request, read_response, MAX_CMD_LENGTH};
use htpump_transport::Transport;

use crate::commands;
use crate::state::SessionState;
use crate::verify::{VerifyAction, VerifySettings};

/// Number of login retries after a failed first attempt.
pub const DEFAULT_LOGIN_RETRIES: u32 = 2;

/// Number of times a corrupted response is discarded and re-read.
pub const DEFAULT_READ_RETRIES: u32 = 3;

/// Client for one heat pump controller
///
/// The client owns its transport and tracks the session state; operations
/// check their preconditions and fail with [`HtpError::NotConnected`] or
/// [`HtpError::NotLoggedIn`] before touching the wire.
#[derive(Debug)]
pub struct HtClient<T: Transport> {
    transport: T,
    state: SessionState,
    catalog: ParameterCatalog,
    verify: VerifySettings,
    login_retries: u32,
    read_retries: u32,
}

impl<T: Transport> HtClient<T> {
    /// Create a client over the given transport with the built-in catalog.
    pub fn new(transport: T) -> HtpResult<Self> {
        Ok(Self::with_catalog(transport, ParameterCatalog::builtin()?))
    }

    /// Create a client with a caller supplied catalog.
    pub fn with_catalog(transport: T, catalog: ParameterCatalog) -> Self {
        Self {
            transport,
            state: SessionState::Disconnected,
            catalog,
            verify: VerifySettings::default(),
            login_retries: DEFAULT_LOGIN_RETRIES,
            read_retries: DEFAULT_READ_RETRIES,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn catalog(&self) -> &ParameterCatalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut ParameterCatalog {
        &mut self.catalog
    }

    pub fn verify_settings(&self) -> &VerifySettings {
        &self.verify
    }

    pub fn set_verify_settings(&mut self, settings: VerifySettings) {
        self.verify = settings;
    }

    pub fn set_login_retries(&mut self, retries: u32) {
        self.login_retries = retries;
    }

    pub fn set_read_retries(&mut self, retries: u32) {
        self.read_retries = retries;
    }

    // -- connection lifecycle ----------------------------------------------

    /// Open the serial connection.
    pub async fn open_connection(&mut self) -> HtpResult<()> {
        self.transport.open().await?;
        self.state = SessionState::Connected;
        Ok(())
    }

    /// Close the serial connection.
    ///
    /// Never fails: a close error is logged and the session still ends up
    /// disconnected.
    pub async fn close_connection(&mut self) {
        if let Err(err) = self.transport.close().await {
            warn!("closing the connection failed: {err}");
        }
        self.state = SessionState::Disconnected;
    }

    /// Drop buffered bytes and reopen the serial connection.
    ///
    /// Any login is lost; the session continues in the connected state.
    pub async fn reconnect(&mut self) -> HtpResult<()> {
        if let Err(err) = self.transport.purge().await {
            warn!("purging the connection failed: {err}");
        }
        if let Err(err) = self.transport.close().await {
            warn!("closing the connection failed: {err}");
        }
        self.state = SessionState::Disconnected;
        self.open_connection().await
    }

    // -- session -----------------------------------------------------------

    /// Log in the controller.
    ///
    /// One regular attempt plus the configured number of retries, with a
    /// reconnect between attempts. With `update_param_limits` set, the
    /// catalog limits are refreshed from the device after a successful
    /// login.
    pub async fn login(&mut self, update_param_limits: bool) -> HtpResult<()> {
        self.ensure_connected()?;
        if self.state.is_logged_in() {
            return Ok(());
        }
        let mut last_error = None;
        for attempt in 1..=self.login_retries + 1 {
            match self.try_login().await {
                Ok(()) => {
                    self.state = SessionState::LoggedIn;
                    info!("login succeeded");
                    if update_param_limits {
                        self.update_param_limits().await?;
                    }
                    return Ok(());
                }
                Err(err @ HtpError::Connection(_)) => return Err(err),
                Err(err) => {
                    warn!("login attempt #{attempt} failed: {err}");
                    last_error = Some(err);
                    self.reconnect().await?;
                }
            }
        }
        let attempts = self.login_retries + 1;
        Err(HtpError::Protocol(match last_error {
            Some(err) => format!("login failed after {attempts} attempt(s): {err}"),
            None => format!("login failed after {attempts} attempt(s)"),
        }))
    }

    async fn try_login(&mut self) -> HtpResult<()> {
        self.send_command(commands::LOGIN_CMD).await?;
        let resp = self.read_answer().await?;
        matched(&commands::OK_RESP, &resp, "LIN")?;
        Ok(())
    }

    /// Log out from the controller session.
    ///
    /// Best effort: a failed logout is logged and the session still drops
    /// back to the connected state.
    pub async fn logout(&mut self) {
        if !self.state.is_logged_in() {
            return;
        }
        match self.try_logout().await {
            Ok(()) => info!("logout succeeded"),
            Err(err) => warn!("logout failed: {err}"),
        }
        if self.state.is_connected() {
            self.state = SessionState::Connected;
        }
    }

    async fn try_logout(&mut self) -> HtpResult<()> {
        self.send_command(commands::LOGOUT_CMD).await?;
        let resp = self.read_answer().await?;
        matched(&commands::OK_RESP, &resp, "LOUT")?;
        Ok(())
    }

    /// Send a raw command and return the controller's answer payload.
    ///
    /// The command is framed and checksummed; no answer vocabulary is
    /// applied, the caller interprets the payload itself.
    pub async fn command(&mut self, command: &str) -> HtpResult<String> {
        self.ensure_connected()?;
        self.send_command(command).await?;
        self.read_answer().await
    }

    // -- identification ----------------------------------------------------

    /// Query for the manufacturer's serial number.
    ///
    /// Available without a login.
    pub async fn get_serial_number(&mut self) -> HtpResult<u32> {
        self.ensure_connected()?;
        self.send_command(commands::RID_CMD).await?;
        let resp = self.read_answer().await?;
        let caps = matched(&commands::RID_RESP, &resp, "RID")?;
        parse_int(&caps[1], "serial number")
    }

    /// Query for the software version as name and revision number,
    /// e.g. `("3.0.20", 2321)`.
    pub async fn get_version(&mut self) -> HtpResult<(String, u32)> {
        self.ensure_logged_in()?;
        self.send_command(commands::VERSION_CMD).await?;
        let resp = self.read_answer().await?;
        let caps = matched(&commands::VERSION_RESP, &resp, "version query")?;
        let version = caps[1].trim().to_string();
        let revision = parse_int(caps[2].trim(), "firmware revision")?;
        Ok((version, revision))
    }

    // -- date and time -----------------------------------------------------

    /// Query for the current date and time of the controller.
    ///
    /// Returns the timestamp and the controller's weekday (1 = Monday).
    pub async fn get_date_time(&mut self) -> HtpResult<(NaiveDateTime, u32)> {
        self.ensure_logged_in()?;
        self.send_command(commands::CLK_CMD).await?;
        let resp = self.read_answer().await?;
        parse_clock_answer(&resp)
    }

    /// Set the date and time of the controller.
    ///
    /// Returns the timestamp and weekday the controller echoed back.
    pub async fn set_date_time(&mut self, dt: NaiveDateTime) -> HtpResult<(NaiveDateTime, u32)> {
        self.ensure_logged_in()?;
        let cmd = commands::clk_set_cmd(
            dt.day(),
            dt.month(),
            dt.year().rem_euclid(100) as u32,
            dt.hour(),
            dt.minute(),
            dt.second(),
            dt.weekday().number_from_monday(),
        );
        self.send_command(&cmd).await?;
        let resp = self.read_answer().await?;
        parse_clock_answer(&resp)
    }

    // -- fault list --------------------------------------------------------

    /// Query for the last fault message.
    pub async fn get_last_fault(&mut self) -> HtpResult<FaultEntry> {
        self.ensure_logged_in()?;
        self.send_command(commands::ALC_CMD).await?;
        let resp = self.read_answer().await?;
        parse_fault_answer(&resp)
    }

    /// Query for the fault list size.
    pub async fn get_fault_list_size(&mut self) -> HtpResult<u32> {
        self.ensure_logged_in()?;
        self.send_command(commands::ALS_CMD).await?;
        let resp = self.read_answer().await?;
        let caps = matched(&commands::SUM_RESP, &resp, "ALS")?;
        parse_int(&caps[1], "fault list size")
    }

    /// Query for the complete fault list.
    pub async fn get_fault_list(&mut self) -> HtpResult<Vec<FaultEntry>> {
        let size = self.get_fault_list_size().await?;
        let indices: Vec<u32> = (0..size).collect();
        self.get_fault_list_entries(&indices).await
    }

    /// Query for specific fault list entries.
    ///
    /// The request is split into several pieces when the index list does
    /// not fit into a single command. The controller answers with one
    /// fault frame per requested index, in request order.
    pub async fn get_fault_list_entries(&mut self, indices: &[u32]) -> HtpResult<Vec<FaultEntry>> {
        self.ensure_logged_in()?;
        let args: Vec<String> = indices.iter().map(u32::to_string).collect();
        let mut entries = Vec::with_capacity(indices.len());
        for (cmd, count) in chunked_requests(commands::AR_CMD, &args) {
            self.send_command(&cmd).await?;
            let mut answers = Vec::with_capacity(count);
            for _ in 0..count {
                answers.push(self.read_answer().await?);
            }
            for answer in &answers {
                let entry = parse_fault_answer(answer)?;
                let expected = indices[entries.len()];
                if entry.index != expected {
                    return Err(HtpError::Protocol(format!(
                        "fault list index {} does not match the requested index {expected}",
                        entry.index
                    )));
                }
                entries.push(entry);
            }
        }
        Ok(entries)
    }

    /// Query whether the controller reports a malfunction.
    pub async fn in_error(&mut self) -> HtpResult<bool> {
        match self.get_param("Stoerung").await? {
            Value::Bool(b) => Ok(b),
            other => Err(HtpError::Protocol(format!(
                "fault indicator answered {other} instead of a BOOL value"
            ))),
        }
    }

    // -- parameter access --------------------------------------------------

    /// Query for the current value of a parameter.
    pub async fn get_param(&mut self, name: &str) -> HtpResult<Value> {
        self.ensure_logged_in()?;
        let desc = self.catalog.resolve(name)?.clone();
        let answer = self.request_param(&desc).await?;
        self.verify_param_answer(&desc, &answer)?;
        debug!("{name:?} = {}", answer.value);
        Ok(answer.value)
    }

    /// Set the value of a parameter.
    ///
    /// The value is checked against the catalog limits before anything is
    /// written. The controller echoes the value it actually applied; an
    /// echo differing from the request fails with
    /// [`HtpError::SetParamRejected`].
    pub async fn set_param(&mut self, name: &str, value: Value) -> HtpResult<Value> {
        self.ensure_logged_in()?;
        let value = self.catalog.validate(name, value)?;
        let desc = self.catalog.resolve(name)?.clone();
        let cmd = format!("{},VAL={}", desc.command(), value.to_wire());
        self.send_command(&cmd).await?;
        let resp = self.read_answer().await?;
        let answer = extract_param_answer(&desc, &resp)?;
        self.verify_param_answer(&desc, &answer)?;
        if answer.value != value {
            return Err(HtpError::SetParamRejected {
                param: name.to_string(),
                requested: value,
                observed: answer.value,
            });
        }
        debug!("{name:?} = {}", answer.value);
        Ok(answer.value)
    }

    /// Query for the current values of several parameters.
    ///
    /// An empty name list queries every parameter in the catalog.
    pub async fn get_params(&mut self, names: &[&str]) -> HtpResult<BTreeMap<String, Value>> {
        let names: Vec<String> = if names.is_empty() {
            self.catalog.names().map(str::to_string).collect()
        } else {
            names.iter().map(|n| n.to_string()).collect()
        };
        let mut values = BTreeMap::new();
        for name in names {
            let value = self.get_param(&name).await?;
            values.insert(name, value);
        }
        Ok(values)
    }

    /// Query for the current values of several MP data points in one
    /// exchange per request piece.
    ///
    /// Considerably faster than [`get_params`](Self::get_params) but
    /// limited to measurement data points and without answer verification.
    /// An empty name list queries every MP data point in the catalog.
    pub async fn fast_query(&mut self, names: &[&str]) -> HtpResult<BTreeMap<String, Value>> {
        self.ensure_logged_in()?;
        let names: Vec<String> = if names.is_empty() {
            self.catalog
                .of_kind(DataPointKind::Measurement)
                .map(|d| d.name().to_string())
                .collect()
        } else {
            names.iter().map(|n| n.to_string()).collect()
        };
        // resolve everything up front so nothing is sent for a bad request
        let mut by_number: BTreeMap<u16, ParameterDescriptor> = BTreeMap::new();
        for name in &names {
            let desc = self.catalog.resolve(name)?;
            if desc.kind() != DataPointKind::Measurement {
                return Err(HtpError::UnsupportedKind {
                    param: name.clone(),
                    kind: desc.kind(),
                });
            }
            by_number.insert(desc.number(), desc.clone());
        }
        let numbers: Vec<String> = by_number.keys().map(u16::to_string).collect();
        let mut values = BTreeMap::new();
        for (cmd, count) in chunked_requests(commands::MR_CMD, &numbers) {
            self.send_command(&cmd).await?;
            for _ in 0..count {
                let resp = self.read_answer().await?;
                let caps = matched(&commands::MA_RESP, &resp, "MR")?;
                let number: u16 = parse_int(&caps[1], "data point number")?;
                let desc = by_number.get(&number).ok_or_else(|| {
                    HtpError::Protocol(format!(
                        "answer for data point MP,{number} was not requested"
                    ))
                })?;
                let value = Value::parse(&caps[2], desc.data_type(), true)?;
                if !desc.in_limits(&value) {
                    warn!(
                        "value {value} of parameter {:?} is beyond the limits [{:?}, {:?}]",
                        desc.name(),
                        desc.min(),
                        desc.max()
                    );
                }
                values.insert(desc.name().to_string(), value);
            }
        }
        Ok(values)
    }

    /// Refresh the catalog limits of every parameter from the device.
    ///
    /// Returns the names of the parameters whose limits changed.
    pub async fn update_param_limits(&mut self) -> HtpResult<Vec<String>> {
        self.ensure_logged_in()?;
        let names: Vec<String> = self.catalog.names().map(str::to_string).collect();
        let mut updated = Vec::new();
        for name in &names {
            let desc = self.catalog.resolve(name)?.clone();
            let answer = self.request_param(&desc).await?;
            self.verify_name(&desc, &answer.name)?;
            if self
                .catalog
                .refresh_limits(name, answer.min, answer.max)?
            {
                updated.push(name.clone());
            }
        }
        info!(
            "updated {} (of {}) parameter limits",
            updated.len(),
            names.len()
        );
        Ok(updated)
    }

    // -- time programs -----------------------------------------------------

    /// Query for all time programs, headers only.
    pub async fn get_time_progs(&mut self) -> HtpResult<Vec<TimeProgram>> {
        self.ensure_logged_in()?;
        self.send_command(commands::PRL_CMD).await?;
        let resp = self.read_answer().await?;
        let caps = matched(&commands::SUM_RESP, &resp, "PRL")?;
        let count: u32 = parse_int(&caps[1], "time program count")?;
        let mut progs = Vec::with_capacity(count as usize);
        for index in 0..count {
            let resp = self.read_answer().await?;
            progs.push(parse_prog_header(index, &resp)?);
        }
        Ok(progs)
    }

    /// Query for one time program, with or without its entries.
    pub async fn get_time_prog(&mut self, index: u32, with_entries: bool) -> HtpResult<TimeProgram> {
        self.ensure_logged_in()?;
        if !with_entries {
            self.send_command(&commands::pri_cmd(index)).await?;
            let resp = self.read_answer().await?;
            return parse_prog_header(index, &resp);
        }
        self.send_command(&commands::prd_cmd(index)).await?;
        let resp = self.read_answer().await?;
        let header = parse_prog_header(index, &resp)?;
        let days = header.number_of_days() as u32;
        let per_day = header.entries_per_day() as u32;
        let mut slots = Vec::with_capacity((days * per_day) as usize);
        for day in 0..days {
            for entry in 0..per_day {
                let resp = self.read_answer().await?;
                slots.push(parse_entry_answer(index, day, entry, &resp)?);
            }
        }
        TimeProgram::from_slots(
            index,
            header.name(),
            header.entries_per_day(),
            header.number_of_states(),
            header.step(),
            header.number_of_days(),
            &slots,
        )
    }

    /// Query for one time program slot.
    ///
    /// `None` is an unused slot.
    pub async fn get_time_prog_entry(
        &mut self,
        index: u32,
        day: u32,
        entry: u32,
    ) -> HtpResult<Option<TimeProgPeriod>> {
        self.ensure_logged_in()?;
        self.send_command(&commands::pre_get_cmd(index, day, entry))
            .await?;
        let resp = self.read_answer().await?;
        parse_entry_answer(index, day, entry, &resp)
    }

    /// Write one time program slot and return the controller's echo.
    ///
    /// `None` clears the slot.
    pub async fn set_time_prog_entry(
        &mut self,
        index: u32,
        day: u32,
        entry: u32,
        period: Option<TimeProgPeriod>,
    ) -> HtpResult<Option<TimeProgPeriod>> {
        self.ensure_logged_in()?;
        let cmd = match &period {
            Some(p) => {
                commands::pre_set_cmd(index, day, entry, p.state(), &p.start_str(), &p.end_str())
            }
            // an unused slot is stored as a zero length period
            None => commands::pre_set_cmd(index, day, entry, 0, "00:00", "00:00"),
        };
        self.send_command(&cmd).await?;
        let resp = self.read_answer().await?;
        parse_entry_answer(index, day, entry, &resp)
    }

    /// Write a whole time program and return it as echoed by the device.
    ///
    /// The schedule is validated against the tiling invariants before the
    /// first slot is written.
    pub async fn set_time_prog(&mut self, prog: &TimeProgram) -> HtpResult<TimeProgram> {
        self.ensure_logged_in()?;
        let slots = prog.to_slots()?;
        let per_day = prog.entries_per_day() as u32;
        let mut echoed = Vec::with_capacity(slots.len());
        for (i, slot) in slots.iter().enumerate() {
            let day = i as u32 / per_day;
            let entry = i as u32 % per_day;
            echoed.push(
                self.set_time_prog_entry(prog.index(), day, entry, *slot)
                    .await?,
            );
        }
        TimeProgram::from_slots(
            prog.index(),
            prog.name(),
            prog.entries_per_day(),
            prog.number_of_states(),
            prog.step(),
            prog.number_of_days(),
            &echoed,
        )
    }

    // -- wire plumbing -----------------------------------------------------

    fn ensure_connected(&self) -> HtpResult<()> {
        if !self.state.is_connected() {
            return Err(HtpError::NotConnected);
        }
        Ok(())
    }

    fn ensure_logged_in(&self) -> HtpResult<()> {
        self.ensure_connected()?;
        if !self.state.is_logged_in() {
            return Err(HtpError::NotLoggedIn);
        }
        Ok(())
    }

    async fn send_command(&mut self, command: &str) -> HtpResult<()> {
        let frame = encode_request(command)?;
        debug!("sending request {command:?}");
        self.transport.write_all(&frame).await?;
        self.transport.flush().await
    }

    /// Read one response, discarding corrupted frames up to the retry
    /// bound.
    ///
    /// A connection error drops the session to the disconnected state.
    async fn read_answer(&mut self) -> HtpResult<String> {
        let mut attempts = 0;
        loop {
            attempts += 1;
            match read_response(&mut self.transport).await {
                Ok(resp) => return Ok(resp),
                Err(err) if err.is_frame_error() && attempts <= self.read_retries => {
                    warn!("discarding corrupted response (attempt #{attempts}): {err}");
                }
                Err(HtpError::Timeout) | Err(HtpError::Frame { .. }) => {
                    return Err(HtpError::NoResponse { attempts });
                }
                Err(err @ HtpError::Connection(_)) => {
                    self.state = SessionState::Disconnected;
                    return Err(err);
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn request_param(&mut self, desc: &ParameterDescriptor) -> HtpResult<ParamAnswer> {
        self.send_command(&desc.command()).await?;
        let resp = self.read_answer().await?;
        extract_param_answer(desc, &resp)
    }

    fn verify_name(&self, desc: &ParameterDescriptor, answered: &str) -> HtpResult<()> {
        if self.verify.verifies(VerifyAction::Name) && answered != desc.name() {
            return self.verification_failure(format!(
                "parameter name {answered:?} does not match {:?}",
                desc.name()
            ));
        }
        Ok(())
    }

    /// Cross-check a parameter answer against the catalog.
    fn verify_param_answer(&self, desc: &ParameterDescriptor, answer: &ParamAnswer) -> HtpResult<()> {
        self.verify_name(desc, &answer.name)?;
        if self.verify.verifies(VerifyAction::Min)
            && answer.min.is_some()
            && desc.min().is_some()
            && answer.min != desc.min()
        {
            return self.verification_failure(format!(
                "minimal value {:?} of parameter {:?} does not match {:?}",
                answer.min,
                desc.name(),
                desc.min()
            ));
        }
        if self.verify.verifies(VerifyAction::Max)
            && answer.max.is_some()
            && desc.max().is_some()
            && answer.max != desc.max()
        {
            return self.verification_failure(format!(
                "maximal value {:?} of parameter {:?} does not match {:?}",
                answer.max,
                desc.name(),
                desc.max()
            ));
        }
        if self.verify.verifies(VerifyAction::Value) && !desc.in_limits(&answer.value) {
            warn!(
                "value {} of parameter {:?} is beyond the limits [{:?}, {:?}]",
                answer.value,
                desc.name(),
                desc.min(),
                desc.max()
            );
        }
        Ok(())
    }

    fn verification_failure(&self, message: String) -> HtpResult<()> {
        if self.verify.treat_as_error {
            return Err(HtpError::Verification(message));
        }
        warn!("answer verification failed: {message}");
        Ok(())
    }

    /// Give up the transport.
    pub fn into_transport(self) -> T {
        self.transport
    }
}

/// Decoded fields of a parameter answer
#[derive(Debug)]
struct ParamAnswer {
    name: String,
    min: Option<Value>,
    max: Option<Value>,
    value: Value,
}

fn extract_param_answer(desc: &ParameterDescriptor, resp: &str) -> HtpResult<ParamAnswer> {
    let re = commands::param_resp(&desc.command());
    let caps = matched(&re, resp, &format!("access of parameter {:?}", desc.name()))?;
    let ty = desc.data_type();
    Ok(ParamAnswer {
        name: caps[1].trim().to_string(),
        value: Value::parse(caps[2].trim(), ty, true)?,
        max: Some(Value::parse(caps[3].trim(), ty, false)?),
        min: Some(Value::parse(caps[4].trim(), ty, false)?),
    })
}

fn parse_clock_answer(resp: &str) -> HtpResult<(NaiveDateTime, u32)> {
    let caps = matched(&commands::CLK_RESP, resp, "CLK")?;
    let (day, month, year) = (
        parse_int(&caps[1], "day")?,
        parse_int(&caps[2], "month")?,
        parse_int::<i32>(&caps[3], "year")?,
    );
    let (hour, minute, second) = (
        parse_int(&caps[4], "hour")?,
        parse_int(&caps[5], "minute")?,
        parse_int(&caps[6], "second")?,
    );
    let weekday = parse_int(&caps[7], "weekday")?;
    let dt = NaiveDate::from_ymd_opt(2000 + year, month, day)
        .and_then(|d| d.and_hms_opt(hour, minute, second))
        .ok_or_else(|| HtpError::Protocol(format!("invalid clock answer {resp:?}")))?;
    Ok((dt, weekday))
}

fn parse_fault_answer(resp: &str) -> HtpResult<FaultEntry> {
    let caps = matched(&commands::FAULT_RESP, resp, "fault list query")?;
    Ok(FaultEntry {
        index: parse_int(&caps[1], "fault list index")?,
        error_code: parse_int(&caps[2], "error code")?,
        timestamp: parse_wire_date_time(&caps[3], &caps[4])?,
        message: caps[5].trim().to_string(),
    })
}

fn parse_prog_header(index: u32, resp: &str) -> HtpResult<TimeProgram> {
    let re = commands::pri_resp(index);
    let caps = matched(&re, resp, &format!("time program {index} query"))?;
    Ok(TimeProgram::new(
        index,
        caps[1].trim(),
        parse_int(caps[2].trim(), "entries per day")?,
        parse_int(caps[3].trim(), "number of states")?,
        parse_int(caps[4].trim(), "step width")?,
        parse_int(caps[5].trim(), "number of days")?,
    ))
}

fn parse_entry_answer(
    index: u32,
    day: u32,
    entry: u32,
    resp: &str,
) -> HtpResult<Option<TimeProgPeriod>> {
    let re = commands::pre_resp(index, day, entry);
    let caps = matched(
        &re,
        resp,
        &format!("entry {entry} of day {day} of time program {index}"),
    )?;
    TimeProgPeriod::from_wire(&caps[1], &caps[2], &caps[3])
}

fn matched<'a>(re: &Regex, resp: &'a str, what: &str) -> HtpResult<Captures<'a>> {
    re.captures(resp)
        .ok_or_else(|| HtpError::Protocol(format!("invalid answer for {what}: {resp:?}")))
}

fn parse_int<N: std::str::FromStr>(s: &str, what: &str) -> HtpResult<N> {
    s.parse()
        .map_err(|_| HtpError::Protocol(format!("invalid {what} {s:?}")))
}

/// Split request arguments into commands no longer than the frame allows.
///
/// Returns each command together with the number of arguments it carries,
/// which equals the number of answer frames to expect.
fn chunked_requests(verb: &str, args: &[String]) -> Vec<(String, usize)> {
    let mut out = Vec::new();
    let mut cmd = String::from(verb);
    let mut count = 0;
    for arg in args {
        if count > 0 && cmd.len() + arg.len() + 1 > MAX_CMD_LENGTH {
            out.push((std::mem::replace(&mut cmd, String::from(verb)), count));
            count = 0;
        }
        cmd.push(',');
        cmd.push_str(arg);
        count += 1;
    }
    if count > 0 {
        out.push((cmd, count));
    }
    out
}
