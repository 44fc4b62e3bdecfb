// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Smart home device list (`getdevicelistinfos`)

use serde::Deserialize;

use crate::error::{AppError, Result};

/// Device capabilities encoded in the `functionbitmask` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    HanFunDevice,
    AlarmSensor,
    RadiatorRegulator,
    EnergyMeter,
    TemperatureSensor,
    SwitchableSocket,
    DectRepeater,
    Microphone,
    HanFunUnit,
}

impl Capability {
    pub const ALL: [Capability; 9] = [
        Capability::HanFunDevice,
        Capability::AlarmSensor,
        Capability::RadiatorRegulator,
        Capability::EnergyMeter,
        Capability::TemperatureSensor,
        Capability::SwitchableSocket,
        Capability::DectRepeater,
        Capability::Microphone,
        Capability::HanFunUnit,
    ];

    /// Bit position in the function bitmask
    #[must_use]
    pub const fn bit(self) -> u32 {
        match self {
            Capability::HanFunDevice => 0,
            Capability::AlarmSensor => 4,
            Capability::RadiatorRegulator => 6,
            Capability::EnergyMeter => 7,
            Capability::TemperatureSensor => 8,
            Capability::SwitchableSocket => 9,
            Capability::DectRepeater => 10,
            Capability::Microphone => 11,
            Capability::HanFunUnit => 13,
        }
    }

    #[must_use]
    pub const fn mask(self) -> u64 {
        1 << self.bit()
    }
}

/// Set of capabilities a device supports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities(u64);

impl Capabilities {
    /// Parses the signed decimal bitmask from the wire
    ///
    /// The value is read as a 64-bit two's complement number, so `-1` sets
    /// every bit. Anything unreadable means "none".
    #[must_use]
    pub fn from_bitmask(raw: &str) -> Self {
        Self(raw.trim().parse::<i64>().map_or(0, |bits| bits as u64))
    }

    #[must_use]
    pub fn contains(self, capability: Capability) -> bool {
        self.0 & capability.mask() != 0
    }

    /// True only if every listed capability is supported
    #[must_use]
    pub fn contains_all(self, capabilities: &[Capability]) -> bool {
        capabilities.iter().all(|c| self.contains(*c))
    }

    /// Named capabilities present in the set
    pub fn iter(self) -> impl Iterator<Item = Capability> {
        Capability::ALL.into_iter().filter(move |c| self.contains(*c))
    }
}

impl FromIterator<Capability> for Capabilities {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self(iter.into_iter().fold(0, |bits, c| bits | c.mask()))
    }
}

/// Switch state of a switchable socket
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SwitchInfo {
    /// "1" on, "0" off, empty if unknown
    pub state: String,
    /// "manuell" or "auto"
    pub mode: String,
    pub lock: String,
    pub devicelock: String,
}

impl SwitchInfo {
    #[must_use]
    pub fn is_powered_on(&self) -> bool {
        self.state.trim() == "1"
    }
}

/// Energy meter readings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PowerInfo {
    /// Milliwatts
    pub power: String,
    /// Watt hours since initial setup
    pub energy: String,
    /// Millivolts
    pub voltage: String,
}

impl PowerInfo {
    /// Power in watts
    #[must_use]
    pub fn watts(&self) -> f64 {
        parse_scaled(&self.power, 1000.0)
    }

    /// Voltage in volts
    #[must_use]
    pub fn volts(&self) -> f64 {
        parse_scaled(&self.voltage, 1000.0)
    }

    /// Accumulated energy in watt hours
    #[must_use]
    pub fn watt_hours(&self) -> f64 {
        parse_scaled(&self.energy, 1.0)
    }
}

/// Temperature sensor readings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TemperatureInfo {
    /// Tenths of a degree Celsius
    pub celsius: String,
    /// User defined offset, tenths of a degree Celsius
    pub offset: String,
}

impl TemperatureInfo {
    #[must_use]
    pub fn celsius(&self) -> f64 {
        parse_scaled(&self.celsius, 10.0)
    }
}

/// Parses a raw decimal reading; unparsable input reads as zero
fn parse_scaled(raw: &str, divisor: f64) -> f64 {
    raw.trim().parse::<f64>().unwrap_or(0.0) / divisor
}

#[derive(Debug, Deserialize)]
struct WireDeviceList {
    #[serde(rename = "device", default)]
    devices: Vec<WireDevice>,
}

#[derive(Debug, Deserialize)]
struct WireDevice {
    #[serde(rename = "@identifier", default)]
    identifier: String,
    #[serde(rename = "@id", default)]
    id: String,
    #[serde(rename = "@functionbitmask", default)]
    functionbitmask: String,
    #[serde(rename = "@fwversion", default)]
    fwversion: String,
    #[serde(rename = "@manufacturer", default)]
    manufacturer: String,
    #[serde(rename = "@productname", default)]
    productname: String,
    #[serde(default)]
    present: String,
    #[serde(default)]
    name: String,
    switch: Option<SwitchInfo>,
    powermeter: Option<PowerInfo>,
    temperature: Option<TemperatureInfo>,
}

/// One smart home device from a single poll
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Device {
    /// AIN, MAC address or similar unique id
    pub identifier: String,
    /// FRITZ!Box internal id
    pub internal_id: String,
    pub name: String,
    pub present: bool,
    pub capabilities: Capabilities,
    pub firmware_version: String,
    pub manufacturer: String,
    pub product_name: String,
    pub switch: Option<SwitchInfo>,
    pub power: Option<PowerInfo>,
    pub temperature: Option<TemperatureInfo>,
}

impl Device {
    #[must_use]
    pub fn has(&self, capabilities: &[Capability]) -> bool {
        self.capabilities.contains_all(capabilities)
    }

    #[must_use]
    pub fn can_measure_power(&self) -> bool {
        self.capabilities.contains(Capability::EnergyMeter)
    }

    #[must_use]
    pub fn can_measure_temperature(&self) -> bool {
        self.capabilities.contains(Capability::TemperatureSensor)
    }

    #[must_use]
    pub fn is_switch(&self) -> bool {
        self.capabilities.contains(Capability::SwitchableSocket)
    }
}

impl From<WireDevice> for Device {
    fn from(wire: WireDevice) -> Self {
        Self {
            identifier: wire.identifier,
            internal_id: wire.id,
            name: wire.name,
            present: wire.present.trim() == "1",
            capabilities: Capabilities::from_bitmask(&wire.functionbitmask),
            firmware_version: wire.fwversion,
            manufacturer: wire.manufacturer,
            product_name: wire.productname,
            switch: wire.switch,
            power: wire.powermeter,
            temperature: wire.temperature,
        }
    }
}

/// Decodes a `devicelist` XML document
///
/// # Errors
///
/// Returns `AppError::Decode` if the document is not well-formed.
pub fn decode_device_list(bytes: &[u8]) -> Result<Vec<Device>> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| AppError::Decode(format!("device list is not UTF-8: {e}")))?;
    let list: WireDeviceList = quick_xml::de::from_str(text)
        .map_err(|e| AppError::Decode(format!("failed to parse device list: {e}")))?;
    Ok(list.devices.into_iter().map(Device::from).collect())
}
