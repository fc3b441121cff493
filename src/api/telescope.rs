use super::time_repr::{UtcDate, UtcDateParam};
use crate::Result;
use macro_rules_attribute::apply;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::Deserialize;
use serde_repr::Deserialize_repr;
use std::ops::RangeInclusive;
use std::time::SystemTime;

/// Telescope specific methods.
///
/// Right ascension is in hours, declination, altitude and azimuth in degrees.
#[apply(device_interface)]
pub trait Telescope: Device {
    /// The alignment mode (geometry) of the mount.
    #[http("alignmentmode", method = Get)]
    async fn alignment_mode(&self) -> Result<AlignmentMode>;

    /// Altitude above the local horizon of the mount's current position, in degrees, positive up.
    #[http("altitude", method = Get)]
    async fn altitude(&self) -> Result<f64>;

    /// Area of the telescope's aperture taking into account any obstructions, in square meters.
    #[http("aperturearea", method = Get)]
    async fn aperture_area(&self) -> Result<f64>;

    /// Effective aperture diameter of the telescope, in meters.
    #[http("aperturediameter", method = Get)]
    async fn aperture_diameter(&self) -> Result<f64>;

    /// True if the mount is stopped in the home position.
    #[http("athome", method = Get)]
    async fn at_home(&self) -> Result<bool>;

    /// True if the telescope has been put into the parked state.
    #[http("atpark", method = Get)]
    async fn at_park(&self) -> Result<bool>;

    /// Azimuth at the local horizon of the mount's current position, in degrees, North-referenced, positive East.
    #[http("azimuth", method = Get)]
    async fn azimuth(&self) -> Result<f64>;

    /// True if the mount can find its home position.
    #[http("canfindhome", method = Get)]
    async fn can_find_home(&self) -> Result<bool>;

    /// True if the mount can be parked.
    #[http("canpark", method = Get)]
    async fn can_park(&self) -> Result<bool>;

    /// True if the mount supports software-pulsed guiding.
    #[http("canpulseguide", method = Get)]
    async fn can_pulse_guide(&self) -> Result<bool>;

    /// True if the declination rate can be changed for offset tracking.
    #[http("cansetdeclinationrate", method = Get)]
    async fn can_set_declination_rate(&self) -> Result<bool>;

    /// True if the guide rates can be changed.
    #[http("cansetguiderates", method = Get)]
    async fn can_set_guide_rates(&self) -> Result<bool>;

    /// True if the park position can be set.
    #[http("cansetpark", method = Get)]
    async fn can_set_park(&self) -> Result<bool>;

    /// True if the pointing state can be forced with [`set_side_of_pier`](Self::set_side_of_pier).
    #[http("cansetpierside", method = Get)]
    async fn can_set_pier_side(&self) -> Result<bool>;

    /// True if the right ascension rate can be changed for offset tracking.
    #[http("cansetrightascensionrate", method = Get)]
    async fn can_set_right_ascension_rate(&self) -> Result<bool>;

    /// True if tracking can be turned on and off.
    #[http("cansettracking", method = Get)]
    async fn can_set_tracking(&self) -> Result<bool>;

    /// True if the mount can slew synchronously to equatorial coordinates.
    #[http("canslew", method = Get)]
    async fn can_slew(&self) -> Result<bool>;

    /// True if the mount can slew synchronously to local horizontal coordinates.
    #[http("canslewaltaz", method = Get)]
    async fn can_slew_alt_az(&self) -> Result<bool>;

    /// True if the mount can slew asynchronously to local horizontal coordinates.
    #[http("canslewaltazasync", method = Get)]
    async fn can_slew_alt_az_async(&self) -> Result<bool>;

    /// True if the mount can slew asynchronously to equatorial coordinates.
    #[http("canslewasync", method = Get)]
    async fn can_slew_async(&self) -> Result<bool>;

    /// True if the mount can sync to equatorial coordinates.
    #[http("cansync", method = Get)]
    async fn can_sync(&self) -> Result<bool>;

    /// True if the mount can sync to local horizontal coordinates.
    #[http("cansyncaltaz", method = Get)]
    async fn can_sync_alt_az(&self) -> Result<bool>;

    /// True if the mount can be unparked.
    #[http("canunpark", method = Get)]
    async fn can_unpark(&self) -> Result<bool>;

    /// Declination of the mount's current position, in degrees.
    #[http("declination", method = Get)]
    async fn declination(&self) -> Result<f64>;

    /// Declination tracking rate offset, in arcseconds per SI second.
    #[http("declinationrate", method = Get)]
    async fn declination_rate(&self) -> Result<f64>;

    /// Set the declination tracking rate offset.
    #[http("declinationrate", method = Put)]
    async fn set_declination_rate(
        &self,
        #[http("DeclinationRate")] declination_rate: f64,
    ) -> Result;

    /// True if the mount applies atmospheric refraction to coordinates.
    #[http("doesrefraction", method = Get)]
    async fn does_refraction(&self) -> Result<bool>;

    /// Enable or disable atmospheric refraction correction.
    #[http("doesrefraction", method = Put)]
    async fn set_does_refraction(&self, #[http("DoesRefraction")] does_refraction: bool) -> Result;

    /// Equatorial coordinate system used by the mount.
    #[http("equatorialsystem", method = Get)]
    async fn equatorial_system(&self) -> Result<EquatorialCoordinateType>;

    /// Focal length of the telescope, in meters.
    #[http("focallength", method = Get)]
    async fn focal_length(&self) -> Result<f64>;

    /// Current declination guide rate, in degrees per second.
    #[http("guideratedeclination", method = Get)]
    async fn guide_rate_declination(&self) -> Result<f64>;

    /// Set the declination guide rate.
    #[http("guideratedeclination", method = Put)]
    async fn set_guide_rate_declination(
        &self,
        #[http("GuideRateDeclination")] guide_rate_declination: f64,
    ) -> Result;

    /// Current right ascension guide rate, in degrees per second.
    #[http("guideraterightascension", method = Get)]
    async fn guide_rate_right_ascension(&self) -> Result<f64>;

    /// Set the right ascension guide rate.
    #[http("guideraterightascension", method = Put)]
    async fn set_guide_rate_right_ascension(
        &self,
        #[http("GuideRateRightAscension")] guide_rate_right_ascension: f64,
    ) -> Result;

    /// True if a pulse guide command is in progress.
    #[http("ispulseguiding", method = Get)]
    async fn is_pulse_guiding(&self) -> Result<bool>;

    /// Right ascension of the mount's current position, in hours.
    #[http("rightascension", method = Get)]
    async fn right_ascension(&self) -> Result<f64>;

    /// Right ascension tracking rate offset, in seconds per sidereal second.
    #[http("rightascensionrate", method = Get)]
    async fn right_ascension_rate(&self) -> Result<f64>;

    /// Set the right ascension tracking rate offset.
    #[http("rightascensionrate", method = Put)]
    async fn set_right_ascension_rate(
        &self,
        #[http("RightAscensionRate")] right_ascension_rate: f64,
    ) -> Result;

    /// Pointing state of the mount.
    #[http("sideofpier", method = Get)]
    async fn side_of_pier(&self) -> Result<PierSide>;

    /// Force a flip to the given pointing state.
    #[http("sideofpier", method = Put, tier = Long)]
    async fn set_side_of_pier(&self, #[http("SideOfPier")] side_of_pier: PierSide) -> Result;

    /// Local apparent sidereal time, in hours.
    #[http("siderealtime", method = Get)]
    async fn sidereal_time(&self) -> Result<f64>;

    /// Elevation above mean sea level of the site, in meters.
    #[http("siteelevation", method = Get)]
    async fn site_elevation(&self) -> Result<f64>;

    /// Set the elevation of the site.
    #[http("siteelevation", method = Put)]
    async fn set_site_elevation(&self, #[http("SiteElevation")] site_elevation: f64) -> Result;

    /// Geodetic latitude of the site, in degrees, positive North.
    #[http("sitelatitude", method = Get)]
    async fn site_latitude(&self) -> Result<f64>;

    /// Set the latitude of the site.
    #[http("sitelatitude", method = Put)]
    async fn set_site_latitude(&self, #[http("SiteLatitude")] site_latitude: f64) -> Result;

    /// Longitude of the site, in degrees, positive East.
    #[http("sitelongitude", method = Get)]
    async fn site_longitude(&self) -> Result<f64>;

    /// Set the longitude of the site.
    #[http("sitelongitude", method = Put)]
    async fn set_site_longitude(&self, #[http("SiteLongitude")] site_longitude: f64) -> Result;

    /// True if the mount is slewing.
    #[http("slewing", method = Get)]
    async fn slewing(&self) -> Result<bool>;

    /// Post-slew settling time, in seconds.
    #[http("slewsettletime", method = Get)]
    async fn slew_settle_time(&self) -> Result<i32>;

    /// Set the post-slew settling time.
    #[http("slewsettletime", method = Put)]
    async fn set_slew_settle_time(&self, #[http("SlewSettleTime")] slew_settle_time: i32) -> Result;

    /// Declination of the target, in degrees.
    #[http("targetdeclination", method = Get)]
    async fn target_declination(&self) -> Result<f64>;

    /// Set the declination of the target.
    #[http("targetdeclination", method = Put)]
    async fn set_target_declination(
        &self,
        #[http("TargetDeclination")] target_declination: f64,
    ) -> Result;

    /// Right ascension of the target, in hours.
    #[http("targetrightascension", method = Get)]
    async fn target_right_ascension(&self) -> Result<f64>;

    /// Set the right ascension of the target.
    #[http("targetrightascension", method = Put)]
    async fn set_target_right_ascension(
        &self,
        #[http("TargetRightAscension")] target_right_ascension: f64,
    ) -> Result;

    /// True if the mount is tracking.
    #[http("tracking", method = Get)]
    async fn tracking(&self) -> Result<bool>;

    /// Turn tracking on or off.
    #[http("tracking", method = Put)]
    async fn set_tracking(&self, #[http("Tracking")] tracking: bool) -> Result;

    /// Current tracking rate.
    #[http("trackingrate", method = Get)]
    async fn tracking_rate(&self) -> Result<DriveRate>;

    /// Set the tracking rate.
    #[http("trackingrate", method = Put)]
    async fn set_tracking_rate(&self, #[http("TrackingRate")] tracking_rate: DriveRate) -> Result;

    /// Tracking rates supported by the mount.
    #[http("trackingrates", method = Get)]
    async fn tracking_rates(&self) -> Result<Vec<DriveRate>>;

    /// UTC date and time of the mount's internal clock.
    #[http("utcdate", method = Get, via = UtcDate)]
    async fn utc_date(&self) -> Result<SystemTime>;

    /// Set the UTC date and time of the mount's internal clock.
    #[http("utcdate", method = Put)]
    async fn set_utc_date(
        &self,
        #[http("UTCDate", via = UtcDateParam)] utc_date: SystemTime,
    ) -> Result;

    /// Immediately stop a slew in progress.
    #[http("abortslew", method = Put, tier = Long)]
    async fn abort_slew(&self) -> Result;

    /// Rates at which the mount can be moved about the given axis, in degrees per second.
    #[http("axisrates", method = Get, via = AxisRates)]
    async fn axis_rates(
        &self,
        #[http("Axis")] axis: TelescopeAxis,
    ) -> Result<Vec<RangeInclusive<f64>>>;

    /// True if the mount can be moved about the given axis.
    #[http("canmoveaxis", method = Get)]
    async fn can_move_axis(&self, #[http("Axis")] axis: TelescopeAxis) -> Result<bool>;

    /// Pointing state after a slew to the given equatorial coordinates.
    #[http("destinationsideofpier", method = Get)]
    async fn destination_side_of_pier(
        &self,
        #[http("RightAscension")] right_ascension: f64,
        #[http("Declination")] declination: f64,
    ) -> Result<PierSide>;

    /// Move the mount to its home position.
    #[http("findhome", method = Put, tier = Long)]
    async fn find_home(&self) -> Result;

    /// Move the mount about an axis at the given rate, in degrees per second. Zero stops the motion.
    #[http("moveaxis", method = Put, tier = Long)]
    async fn move_axis(
        &self,
        #[http("Axis")] axis: TelescopeAxis,
        #[http("Rate")] rate: f64,
    ) -> Result;

    /// Move the mount to its park position and stop tracking.
    #[http("park", method = Put, tier = Long)]
    async fn park(&self) -> Result;

    /// Move the mount in the given direction for `duration` milliseconds at the guide rate.
    #[http("pulseguide", method = Put, tier = Long)]
    async fn pulse_guide(
        &self,
        #[http("Direction")] direction: GuideDirection,
        #[http("Duration")] duration: i32,
    ) -> Result;

    /// Make the current position the park position.
    #[http("setpark", method = Put, tier = Long)]
    async fn set_park(&self) -> Result;

    /// Slew to local horizontal coordinates and return when the slew is complete.
    #[http("slewtoaltaz", method = Put, tier = Long)]
    async fn slew_to_alt_az(
        &self,
        #[http("Azimuth")] azimuth: f64,
        #[http("Altitude")] altitude: f64,
    ) -> Result;

    /// Start a slew to local horizontal coordinates.
    #[http("slewtoaltazasync", method = Put, tier = Long)]
    async fn slew_to_alt_az_async(
        &self,
        #[http("Azimuth")] azimuth: f64,
        #[http("Altitude")] altitude: f64,
    ) -> Result;

    /// Slew to equatorial coordinates and return when the slew is complete.
    #[http("slewtocoordinates", method = Put, tier = Long)]
    async fn slew_to_coordinates(
        &self,
        #[http("RightAscension")] right_ascension: f64,
        #[http("Declination")] declination: f64,
    ) -> Result;

    /// Start a slew to equatorial coordinates.
    #[http("slewtocoordinatesasync", method = Put, tier = Long)]
    async fn slew_to_coordinates_async(
        &self,
        #[http("RightAscension")] right_ascension: f64,
        #[http("Declination")] declination: f64,
    ) -> Result;

    /// Slew to the target coordinates and return when the slew is complete.
    #[http("slewtotarget", method = Put, tier = Long)]
    async fn slew_to_target(&self) -> Result;

    /// Start a slew to the target coordinates.
    #[http("slewtotargetasync", method = Put, tier = Long)]
    async fn slew_to_target_async(&self) -> Result;

    /// Sync the mount to local horizontal coordinates.
    #[http("synctoaltaz", method = Put, tier = Long)]
    async fn sync_to_alt_az(
        &self,
        #[http("Azimuth")] azimuth: f64,
        #[http("Altitude")] altitude: f64,
    ) -> Result;

    /// Sync the mount to equatorial coordinates.
    #[http("synctocoordinates", method = Put, tier = Long)]
    async fn sync_to_coordinates(
        &self,
        #[http("RightAscension")] right_ascension: f64,
        #[http("Declination")] declination: f64,
    ) -> Result;

    /// Sync the mount to the target coordinates.
    #[http("synctotarget", method = Put, tier = Long)]
    async fn sync_to_target(&self) -> Result;

    /// Take the mount out of the parked state.
    #[http("unpark", method = Put, tier = Long)]
    async fn unpark(&self) -> Result;
}

/// The alignment mode (geometry) of the mount.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Deserialize_repr, TryFromPrimitive, IntoPrimitive)]
#[repr(i32)]
pub enum AlignmentMode {
    /// Altitude-Azimuth type mount.
    AltAz = 0,

    /// Polar (equatorial) mount other than German equatorial.
    Polar = 1,

    /// German equatorial type mount.
    GermanPolar = 2,
}

/// The equatorial coordinate system used by the mount.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Deserialize_repr, TryFromPrimitive, IntoPrimitive)]
#[repr(i32)]
pub enum EquatorialCoordinateType {
    /// Custom or unknown equinox and/or reference frame.
    Other = 0,

    /// Topocentric coordinates.
    Topocentric = 1,

    /// J2000 equator/equinox.
    J2000 = 2,

    /// J2050 equator/equinox.
    J2050 = 3,

    /// B1950 equinox, FK4 reference frame.
    B1950 = 4,
}

/// Pointing state of a German equatorial mount.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Deserialize_repr, TryFromPrimitive, IntoPrimitive)]
#[repr(i32)]
pub enum PierSide {
    /// Normal pointing state. Mount on the East side of pier, looking West.
    East = 0,

    /// Through the pole pointing state. Mount on the West side of pier, looking East.
    West = 1,

    /// Unknown or indeterminate.
    Unknown = -1,
}

/// One of the standard drive rates.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Deserialize_repr, TryFromPrimitive, IntoPrimitive)]
#[repr(i32)]
pub enum DriveRate {
    /// Sidereal tracking rate (15.041 arcseconds per second).
    Sidereal = 0,

    /// Lunar tracking rate (14.685 arcseconds per second).
    Lunar = 1,

    /// Solar tracking rate (15.0 arcseconds per second).
    Solar = 2,

    /// King tracking rate (15.0369 arcseconds per second).
    King = 3,
}

/// Mount axis.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Deserialize_repr, TryFromPrimitive, IntoPrimitive)]
#[repr(i32)]
pub enum TelescopeAxis {
    /// Primary axis (right ascension or azimuth).
    Primary = 0,

    /// Secondary axis (declination or altitude).
    Secondary = 1,

    /// Tertiary axis (imager rotator or de-rotator).
    Tertiary = 2,
}

/// Direction of a guide pulse.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Deserialize_repr, TryFromPrimitive, IntoPrimitive)]
#[repr(i32)]
pub enum GuideDirection {
    /// North (+ declination/altitude).
    North = 0,

    /// South (- declination/altitude).
    South = 1,

    /// East (+ right ascension/azimuth).
    East = 2,

    /// West (- right ascension/azimuth).
    West = 3,
}

crate::params::ascom_enum_param!(PierSide, DriveRate, TelescopeAxis, GuideDirection);

/// Range of rates about one axis, in degrees per second.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AxisRate {
    minimum: f64,
    maximum: f64,
}

#[derive(Debug, Deserialize)]
#[serde(transparent)]
struct AxisRates(Vec<AxisRate>);

impl From<AxisRates> for Vec<RangeInclusive<f64>> {
    fn from(axis_rates: AxisRates) -> Self {
        axis_rates
            .0
            .into_iter()
            .map(|axis_rate| axis_rate.minimum..=axis_rate.maximum)
            .collect()
    }
}
