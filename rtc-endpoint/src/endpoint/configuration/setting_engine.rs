use crate::endpoint::transport::RTCDtlsRole;
use shared::error::{Error, Result};

/// SettingEngine allows influencing behavior in ways that are not
/// supported by the W3C WebRTC API. This allows us to support additional
/// use-cases without deviating from the WebRTC API elsewhere.
#[derive(Default, Debug, Clone)]
pub struct SettingEngine {
    pub(crate) answering_dtls_role: RTCDtlsRole,
    pub(crate) ice_lite: bool,
    pub(crate) cname: String,
}

impl SettingEngine {
    /// Sets the DTLS role used when answering an offer that lets us choose
    /// (`a=setup:actpass`). Defaults to `Client`, written as `a=setup:active`.
    pub fn set_answering_dtls_role(&mut self, role: RTCDtlsRole) -> Result<()> {
        if role != RTCDtlsRole::Client && role != RTCDtlsRole::Server {
            return Err(Error::ErrSettingEngineSetAnsweringDTLSRole);
        }

        self.answering_dtls_role = role;
        Ok(())
    }

    /// set_lite configures whether or not the ice agent should be a lite agent
    pub fn set_lite(&mut self, lite: bool) {
        self.ice_lite = lite;
    }

    /// Sets the canonical name written on `a=ssrc` lines of outbound tracks.
    /// A random one is generated when left empty.
    pub fn set_cname(&mut self, cname: impl Into<String>) {
        self.cname = cname.into();
    }
}
