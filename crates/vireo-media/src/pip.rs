//! Picture-in-Picture
//!
//! Document-level capability gate and request brokering. Requests settle
//! through [`Deferred`] handles; hosts either let the document grant them
//! immediately or queue them for an explicit verdict.

use std::rc::Rc;

use crate::MediaError;
use crate::children::MediaDocument;
use crate::deferred::Deferred;
use crate::element::MediaElement;
use crate::events::MediaEventKind;

/// Which way a request moves the element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipDirection {
    Enter,
    Exit,
}

/// A queued request awaiting a host verdict.
pub(crate) struct PendingRequest {
    pub(crate) direction: PipDirection,
    pub(crate) element: Rc<MediaElement>,
    pub(crate) deferred: Deferred<(), MediaError>,
}

impl MediaDocument {
    pub fn picture_in_picture_enabled(&self) -> bool {
        self.pip_enabled.get()
    }

    pub fn set_picture_in_picture_enabled(&self, enabled: bool) {
        self.pip_enabled.set(enabled);
    }

    /// When off, requests queue until [`MediaDocument::settle_pending`].
    pub fn set_auto_respond(&self, auto: bool) {
        self.auto_respond.set(auto);
    }

    pub fn request_pip_enter(&self, element: &Rc<MediaElement>) -> Deferred<(), MediaError> {
        self.request(PipDirection::Enter, element)
    }

    pub fn request_pip_exit(&self, element: &Rc<MediaElement>) -> Deferred<(), MediaError> {
        self.request(PipDirection::Exit, element)
    }

    fn request(
        &self,
        direction: PipDirection,
        element: &Rc<MediaElement>,
    ) -> Deferred<(), MediaError> {
        if !self.pip_enabled.get() {
            return Deferred::rejected(MediaError::PipUnsupported);
        }
        let deferred = Deferred::new();
        let request = PendingRequest {
            direction,
            element: element.clone(),
            deferred: deferred.clone(),
        };
        if self.auto_respond.get() {
            complete(request, Ok(()));
        } else {
            self.pending.borrow_mut().push(request);
        }
        deferred
    }

    pub fn pending_requests(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Settle every queued request with `result`, oldest first.
    pub fn settle_pending(&self, result: Result<(), MediaError>) {
        let drained: Vec<PendingRequest> = self.pending.borrow_mut().drain(..).collect();
        for request in drained {
            complete(request, result.clone());
        }
    }
}

fn complete(request: PendingRequest, result: Result<(), MediaError>) {
    match result {
        Ok(()) => {
            let entering = request.direction == PipDirection::Enter;
            request.element.set_picture_in_picture(entering);
            let kind = if entering {
                MediaEventKind::EnterPictureInPicture
            } else {
                MediaEventKind::LeavePictureInPicture
            };
            request.element.dispatch(kind);
            request.deferred.resolve(());
        }
        Err(error) => {
            tracing::debug!(%error, "picture-in-picture request denied");
            request.deferred.reject(error);
        }
    }
}
