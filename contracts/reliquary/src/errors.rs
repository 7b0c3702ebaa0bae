use soroban_sdk::contracterror;

/// Errors returned by every Reliquary entry point.
///
/// # Code ranges
/// | Range   | Purpose                          |
/// |---------|----------------------------------|
/// | 1 – 9   | Lifecycle / initialisation       |
/// | 10 – 19 | Authorisation                    |
/// | 20 – 29 | Resource not found               |
/// | 30 – 49 | Invariant violations             |
/// | 50 – 59 | External source sanity           |
/// | 60 – 69 | Relic lifecycle                  |
/// | 70 – 79 | Execution                        |
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,

    /// Caller lacks the role required for a privileged call.
    Unauthorized = 10,
    /// Caller is neither the owner of a relic nor approved for it.
    NotApprovedOrOwner = 11,

    RelicNotFound = 20,
    PoolNotFound = 21,

    ZeroAmount = 30,
    PartialWithdrawalsDisabled = 31,
    AmountExceedsDeposit = 32,
    MergingEmptyRelics = 33,
    RelicsNotOfSamePool = 34,
    DuplicateRelicIds = 35,
    EmptyLevels = 36,
    LevelLengthMismatch = 37,
    NonZeroFirstMaturity = 38,
    UnsortedMaturityLevels = 39,
    ZeroTotalAllocPoint = 40,
    /// The pool token would be the reward token; harvest caps read the
    /// reward balance, so staked principal would become payable.
    TokensIdentical = 41,

    MaxEmissionRateExceeded = 50,
    NegativeEmissionRate = 51,

    BurningPrincipal = 60,
    BurningRewards = 61,

    Reentrancy = 70,
    ArithmeticOverflow = 71,
}
