use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// ErrConnectionClosed indicates an operation executed after the endpoint
    /// has already been closed.
    #[error("connection closed")]
    ErrConnectionClosed,

    /// ErrIncorrectSignalingState indicates that a description arrived that
    /// the current role and negotiation state cannot accept.
    #[error("operation can not be run in current signaling state")]
    ErrIncorrectSignalingState,

    //Track registry
    /// ErrDuplicateTrackId indicates that a track id is already registered
    /// in the same direction.
    #[error("track {0} is already registered")]
    ErrDuplicateTrackId(String),

    /// ErrDuplicateSsrc indicates a pinned SSRC that another track already uses.
    #[error("ssrc {0} is already in use")]
    ErrDuplicateSsrc(u32),

    /// ErrUnspecifiedTrackDirection indicates tracks registered without a direction.
    #[error("track direction is unspecified")]
    ErrUnspecifiedTrackDirection,

    /// ErrTrackNotFound indicates that no track is registered under the id.
    #[error("track {0} not found")]
    ErrTrackNotFound(String),

    /// ErrTrackSsrcUnresolved indicates an inbound track whose SSRC or
    /// encoding has not been resolved yet.
    #[error("track {0} has no resolved ssrc")]
    ErrTrackSsrcUnresolved(String),

    /// ErrTrackNotNegotiated indicates an outbound track that no completed
    /// negotiation round has mapped to a media section.
    #[error("track {0} has not been negotiated")]
    ErrTrackNotNegotiated(String),

    /// ErrUnresolvedSsrc indicates media arrived for an SSRC that no
    /// negotiated media section announced.
    #[error("no media section negotiated for ssrc {0}")]
    ErrUnresolvedSsrc(u32),

    /// ErrUnknownCodecKind indicates a track without an audio or video kind.
    #[error("track {0} has no media kind")]
    ErrUnknownCodecKind(String),

    /// ErrCodecNotFound is returned when a codec search to the Media Engine fails
    #[error("codec not found")]
    ErrCodecNotFound,

    //Configuration
    /// ErrUnknownType indicates an error with Unknown info.
    #[error("unknown")]
    ErrUnknownType,

    /// ErrRegisterHeaderExtensionNoFreeID indicates that there was no extension ID available which
    /// in turn means that all 15 available id(1 through 14) have been used.
    #[error("no header extension ID was free to use(this means the maximum of 15 extensions have been registered)")]
    ErrRegisterHeaderExtensionNoFreeID,

    /// ErrSettingEngineSetAnsweringDTLSRole indicates that an invalid role was
    /// passed to set_answering_dtls_role.
    #[error("set_answering_dtls_role must DTLSRoleClient or DTLSRoleServer")]
    ErrSettingEngineSetAnsweringDTLSRole,

    //Signaling
    /// ErrSessionDescriptionMissingIceUfrag indicates a remote description
    /// with media sections but no ice-ufrag.
    #[error("remote description has no ice-ufrag")]
    ErrSessionDescriptionMissingIceUfrag,

    /// ErrSessionDescriptionMissingIcePwd indicates a remote description
    /// with media sections but no ice-pwd.
    #[error("remote description has no ice-pwd")]
    ErrSessionDescriptionMissingIcePwd,

    /// ErrSessionDescriptionConflictingIceUfrag indicates a remote description
    /// that contains multiple conflicting ice-ufrag values.
    #[error("remote description has multiple conflicting ice-ufrag values")]
    ErrSessionDescriptionConflictingIceUfrag,

    /// ErrSessionDescriptionConflictingIcePwd indicates a remote description
    /// that contains multiple conflicting ice-pwd values.
    #[error("remote description has multiple conflicting ice-pwd values")]
    ErrSessionDescriptionConflictingIcePwd,

    #[error("remote description contained media section without mid value")]
    ErrRemoteDescriptionWithoutMidValue,
    #[error("invalid signaling message: {0}")]
    ErrInvalidSignal(String),
    #[error("SdpInvalidSyntax: {0}")]
    SdpInvalidSyntax(String),
    #[error("SdpInvalidValue: {0}")]
    SdpInvalidValue(String),

    #[error("{0}")]
    Other(String),
}
