// src/driver/sync_driver/calibration.rs

use super::transaction::acknowledge;
use super::PhEzo;
use crate::common::{
    command::{CalibrationPoint, Operation},
    error::{PhEzoError, ValidationError},
    hal_traits::BusTransport,
};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::delay::DelayNs;

impl<M, B, D> PhEzo<M, B, D>
where
    M: RawMutex,
    B: BusTransport,
    D: DelayNs,
{
    /// Applies one calibration point.
    ///
    /// `Low`, `Mid` and `High` need the pH of the reference solution the
    /// probe sits in; `Clear` wipes all points and takes no value. Each call
    /// is independent: which points have been applied is the caller's to
    /// track (see [`calibration_query`](Self::calibration_query)).
    ///
    /// The chip usually expects `Mid` first, since it clears the other
    /// points. Calibration is not idempotent, so a failed call should not be
    /// retried blindly.
    pub fn calibrate(
        &self,
        point: CalibrationPoint,
        reference: Option<f32>,
    ) -> Result<(), PhEzoError<B::Error>> {
        self.execute_transaction(Operation::Calibrate { point, reference }, acknowledge)
    }

    /// Calibrates `point` against its standard buffer (4.00, 7.00 or 10.00).
    pub fn calibrate_nominal(&self, point: CalibrationPoint) -> Result<(), PhEzoError<B::Error>> {
        let reference = point
            .nominal_reference()
            .ok_or(ValidationError::NotApplicable(point))?;
        self.calibrate(point, Some(reference))
    }

    /// Removes all calibration data from the chip.
    pub fn clear_calibration(&self) -> Result<(), PhEzoError<B::Error>> {
        self.calibrate(CalibrationPoint::Clear, None)
    }
}
