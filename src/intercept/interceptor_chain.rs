use std::{fmt, sync::Arc};

use crate::error::Status;

use super::{
    interceptor::{shared, ChainedInterceptor, Interceptor, SharedInterceptor},
    layer::InterceptorLayer,
};

/// An ordered sequence of interceptors.
///
/// Behaves like [`Chain`](crate::chain::Chain): the first interceptor runs
/// first, appending and merging return new chains and never touch the receiver.
pub struct InterceptorChain<Req, Res, E = Status> {
    interceptors: Arc<[SharedInterceptor<Req, Res, E>]>,
}

impl<Req, Res, E> InterceptorChain<Req, Res, E> {
    pub fn new<I>(interceptors: I) -> Self
    where
        I: IntoIterator<Item = SharedInterceptor<Req, Res, E>>,
    {
        Self {
            interceptors: interceptors.into_iter().collect(),
        }
    }

    pub fn append<I>(&self, interceptors: I) -> Self
    where
        I: IntoIterator<Item = SharedInterceptor<Req, Res, E>>,
    {
        Self {
            interceptors: self
                .interceptors
                .iter()
                .cloned()
                .chain(interceptors)
                .collect(),
        }
    }

    pub fn with<I>(&self, interceptor: I) -> Self
    where
        I: Interceptor<Req, Res, E> + Send + Sync + 'static,
    {
        self.append([shared(interceptor)])
    }

    pub fn merge<'a, I>(&self, chains: I) -> Self
    where
        I: IntoIterator<Item = &'a InterceptorChain<Req, Res, E>>,
        Req: 'a,
        Res: 'a,
        E: 'a,
    {
        let merged = chains
            .into_iter()
            .flat_map(|chain| chain.interceptors.iter().cloned());

        Self {
            interceptors: self.interceptors.iter().cloned().chain(merged).collect(),
        }
    }

    pub fn copy_from(&mut self, other: &InterceptorChain<Req, Res, E>) {
        self.interceptors = other.interceptors.iter().cloned().collect();
    }

    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    /// Folds the chain into a single interceptor.
    pub fn interceptor(&self) -> ChainedInterceptor<Req, Res, E> {
        ChainedInterceptor::new(self.interceptors.clone())
    }

    /// Installs the chain as the one interceptor in front of a service.
    pub fn layer(&self) -> InterceptorLayer<Req, Res, E> {
        InterceptorLayer::new(self.interceptor())
    }
}

impl<Req, Res, E> Clone for InterceptorChain<Req, Res, E> {
    fn clone(&self) -> Self {
        Self {
            interceptors: self.interceptors.clone(),
        }
    }
}

impl<Req, Res, E> Default for InterceptorChain<Req, Res, E> {
    fn default() -> Self {
        Self::new([])
    }
}

impl<Req, Res, E> fmt::Debug for InterceptorChain<Req, Res, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptorChain")
            .field("interceptors", &self.interceptors.len())
            .finish()
    }
}
