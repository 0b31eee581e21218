use std::sync::Arc;

use midir::{MidiOutput, MidiOutputConnection, MidiOutputPort};
use tracing::debug;

use crate::sink::MidiTransport;
use crate::MidiError;

const CLIENT_NAME: &str = "keybed";

/// Handle to an open MIDI output connection.
pub struct MidiOutputHandle {
    name: Arc<str>,
    connection: MidiOutputConnection,
}

impl MidiOutputHandle {
    /// Create a new handle from an existing connection.
    pub fn new(name: impl Into<Arc<str>>, connection: MidiOutputConnection) -> Self {
        Self {
            name: name.into(),
            connection,
        }
    }

    /// Name of the connected port.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Send a raw MIDI message over the port.
    pub fn send(&mut self, bytes: &[u8]) -> Result<(), MidiError> {
        self.connection
            .send(bytes)
            .map_err(|err| MidiError::Backend(format!("failed to send MIDI message: {err}")))
    }

    /// Close the connection explicitly.
    pub fn close(self) {
        debug!(port = %self.name, "closing MIDI output");
        self.connection.close();
    }
}

impl MidiTransport for MidiOutputHandle {
    fn send(&mut self, bytes: &[u8]) -> Result<(), MidiError> {
        MidiOutputHandle::send(self, bytes)
    }
}

/// Platform MIDI output helper based on the `midir` crate.
#[derive(Debug, Default)]
pub struct MidiOutputManager;

impl MidiOutputManager {
    pub fn new() -> Self {
        Self
    }

    fn client() -> Result<MidiOutput, MidiError> {
        MidiOutput::new(CLIENT_NAME)
            .map_err(|err| MidiError::Backend(format!("initialise midir output: {err}")))
    }

    /// Enumerate available output port names.
    pub fn enumerate(&self) -> Result<Vec<String>, MidiError> {
        let output = Self::client()?;
        let names = output
            .ports()
            .iter()
            .enumerate()
            .map(|(index, port)| {
                output
                    .port_name(port)
                    .unwrap_or_else(|_| format!("Port {index}"))
            })
            .collect();
        Ok(names)
    }

    /// Open an output connection by index.
    pub fn open_port(&self, port_index: usize) -> Result<MidiOutputHandle, MidiError> {
        let output = Self::client()?;
        let ports: Vec<MidiOutputPort> = output.ports();
        let Some(port) = ports.get(port_index) else {
            return Err(MidiError::UnknownPort(port_index.to_string()));
        };
        let name = output
            .port_name(port)
            .unwrap_or_else(|_| format!("Port {port_index}"));
        Self::connect(output, port, name)
    }

    /// Open the first output whose name contains `needle`.
    pub fn open_named(&self, needle: &str) -> Result<MidiOutputHandle, MidiError> {
        let output = Self::client()?;
        let ports: Vec<MidiOutputPort> = output.ports();
        let found = ports.iter().find_map(|port| {
            let name = output.port_name(port).ok()?;
            name.contains(needle).then_some((port, name))
        });
        let Some((port, name)) = found else {
            return Err(MidiError::UnknownPort(needle.to_string()));
        };
        Self::connect(output, port, name)
    }

    fn connect(
        output: MidiOutput,
        port: &MidiOutputPort,
        name: String,
    ) -> Result<MidiOutputHandle, MidiError> {
        let connection = output
            .connect(port, "keybed-output")
            .map_err(|err| MidiError::Connect(err.to_string()))?;
        debug!(port = %name, "opened MIDI output");
        Ok(MidiOutputHandle::new(name, connection))
    }
}
