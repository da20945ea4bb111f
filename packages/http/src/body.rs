//! Scoped response-body handling for the executor.

use std::io::{self, Read};

use tracing::Dispatch;

use crate::context::Context;
use crate::transport::ResponseBody;

/// Owns a response body and closes it when dropped.
///
/// A failed close is logged at warn level and otherwise ignored.
pub(crate) struct BodyGuard<'a> {
    body: Box<dyn ResponseBody>,
    dispatch: &'a Dispatch,
    method: &'a str,
    url: &'a str,
}

impl<'a> BodyGuard<'a> {
    pub(crate) fn new(
        body: Box<dyn ResponseBody>,
        dispatch: &'a Dispatch,
        method: &'a str,
        url: &'a str,
    ) -> Self {
        Self {
            body,
            dispatch,
            method,
            url,
        }
    }

    /// Read the whole body, giving up once `ctx` is done.
    pub(crate) fn read_all(&mut self, ctx: &Context) -> io::Result<Vec<u8>> {
        let mut bytes = Vec::new();
        ContextReader {
            ctx,
            inner: &mut self.body,
        }
        .read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}

impl Drop for BodyGuard<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.body.close() {
            tracing::dispatcher::with_default(self.dispatch, || {
                tracing::warn!(
                    error = %err,
                    method = self.method,
                    url = self.url,
                    "failed to close response body"
                );
            });
        }
    }
}

/// Checks the context before every read.
///
/// Transports that can block inside a read must also watch the context
/// themselves; this only catches a context that is already done.
struct ContextReader<'a, R> {
    ctx: &'a Context,
    inner: R,
}

impl<R: Read> Read for ContextReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if let Some(err) = self.ctx.err() {
            return Err(err.into());
        }
        self.inner.read(buf)
    }
}
